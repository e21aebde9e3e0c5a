use anyhow::{anyhow, Context};
use captive_portal_domain::config::TlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tokio_rustls::TlsAcceptor;
use tracing::{info, warn};

/// Builds the acceptor for the secure listeners. A missing or unusable
/// certificate/key pair is not an error: the portal keeps running on plain
/// HTTP and the reason is logged.
pub fn load_tls_acceptor(config: &TlsConfig) -> Option<TlsAcceptor> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    if !cert_path.exists() || !key_path.exists() {
        warn!(
            cert = %config.cert_path,
            key = %config.key_path,
            "TLS certificate or key not found, serving plain HTTP only"
        );
        return None;
    }

    match build_acceptor(cert_path, key_path) {
        Ok(acceptor) => {
            info!(cert = %config.cert_path, "TLS enabled");
            Some(acceptor)
        }
        Err(e) => {
            warn!(error = format!("{:#}", e), "TLS material unusable, serving plain HTTP only");
            None
        }
    }
}

fn build_acceptor(cert_path: &Path, key_path: &Path) -> anyhow::Result<TlsAcceptor> {
    static CRYPTO_INIT: OnceLock<()> = OnceLock::new();
    CRYPTO_INIT.get_or_init(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });

    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("building TLS server config")?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

fn load_certs(path: &Path) -> anyhow::Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing certificates in {}", path.display()))?;

    if certs.is_empty() {
        return Err(anyhow!("no certificates found in {}", path.display()));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> anyhow::Result<PrivateKeyDer<'static>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .with_context(|| format!("parsing private key in {}", path.display()))?
        .ok_or_else(|| anyhow!("no private key found in {}", path.display()))
}
