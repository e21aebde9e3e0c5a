#![allow(dead_code)]

use captive_portal_domain::Config;
use std::net::{Ipv4Addr, SocketAddr};
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{timeout, Duration};

pub const INDEX_HTML: &str = "<html><body>Welcome to the portal</body></html>";
pub const PORTAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// Configuration that binds ephemeral loopback ports and polls fast.
pub fn test_config(www: &TempDir) -> Config {
    std::fs::write(www.path().join("index.html"), INDEX_HTML).unwrap();

    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1".to_string();
    config.server.dns_port = 0;
    config.server.http_ports = vec![0];
    config.server.https_ports = vec![];
    config.server.web_root = www.path().to_string_lossy().into_owned();
    config.server.request_timeout_secs = 5;
    config.interfaces.activation_timeout_ms = 200;
    config.interfaces.connect_timeout_ms = 2000;
    config.interfaces.poll_interval_ms = 10;
    config.shutdown.drain_timeout_secs = 2;
    config.tls.cert_path = www.path().join("absent-cert.pem").to_string_lossy().into_owned();
    config.tls.key_path = www.path().join("absent-key.pem").to_string_lossy().into_owned();
    config
}

pub fn dns_query(id: u16, domain: &str) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
    for label in domain.split('.') {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.extend_from_slice(&[0, 0x00, 0x01, 0x00, 0x01]);
    packet
}

pub async fn resolve(dns_addr: SocketAddr, id: u16, domain: &str) -> Vec<u8> {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket
        .send_to(&dns_query(id, domain), dns_addr)
        .await
        .unwrap();
    let mut buf = [0u8; 512];
    let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("no DNS reply")
        .unwrap();
    buf[..len].to_vec()
}

pub async fn exchange<S>(mut stream: S, request: &str) -> String
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    // A peer that closes without a TLS close_notify surfaces as an error
    // after the bytes have already been collected.
    let _ = timeout(Duration::from_secs(3), stream.read_to_end(&mut response))
        .await
        .expect("HTTP response timed out");
    String::from_utf8_lossy(&response).into_owned()
}

pub async fn http_get(addr: SocketAddr, path: &str) -> String {
    let stream = TcpStream::connect(addr).await.unwrap();
    exchange(
        stream,
        &format!("GET {} HTTP/1.0\r\nHost: portal\r\n\r\n", path),
    )
    .await
}

pub async fn http_post_form(addr: SocketAddr, path: &str, form: &str) -> String {
    let stream = TcpStream::connect(addr).await.unwrap();
    exchange(
        stream,
        &format!(
            "POST {} HTTP/1.0\r\nHost: portal\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
            path,
            form.len(),
            form
        ),
    )
    .await
}

pub fn body_of(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}
