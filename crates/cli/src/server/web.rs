use anyhow::{anyhow, Context};
use axum::{extract::ConnectInfo, Router};
use captive_portal_domain::config::ServerConfig;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, timeout, Instant};
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower::ServiceExt;
use tracing::{debug, info, warn};

const BUSY_BODY: &str = r#"{"error":"server too busy"}"#;
/// How long a rejected client gets to send its request before the 503 goes
/// out. Closing with unread bytes would reset the connection.
const BUSY_READ_WAIT: Duration = Duration::from_millis(100);
/// How long connections that outlived the drain get to unwind after being
/// cut off.
const CUTOFF_GRACE: Duration = Duration::from_millis(500);

struct Listener {
    inner: TcpListener,
    tls: Option<TlsAcceptor>,
}

struct ConnectionContext {
    app: Router,
    limiter: Arc<Semaphore>,
    request_timeout: Duration,
    response_budget: Duration,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    cutoff: CancellationToken,
}

/// Plain and TLS listeners in front of the portal router. Each connection
/// carries exactly one request and is closed after the response.
pub struct HttpDispatcher {
    listeners: Vec<Listener>,
    max_connections: usize,
    request_timeout: Duration,
    response_budget: Duration,
    drain_timeout: Duration,
}

impl HttpDispatcher {
    /// Binds every configured plain port, plus the secure ports when an
    /// acceptor is given. Ports that fail to bind are skipped; failing to
    /// bind any plain port is an error.
    pub async fn bind(
        config: &ServerConfig,
        tls: Option<TlsAcceptor>,
        drain_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let ip: IpAddr = config
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address {}", config.bind_address))?;

        let mut listeners = Vec::new();
        for port in &config.http_ports {
            match TcpListener::bind(SocketAddr::new(ip, *port)).await {
                Ok(inner) => {
                    info!(bind_address = %inner.local_addr()?, "HTTP listener bound");
                    listeners.push(Listener { inner, tls: None });
                }
                Err(e) => warn!(port, error = %e, "HTTP port unavailable, skipping"),
            }
        }

        if listeners.is_empty() {
            return Err(anyhow!(
                "no HTTP port could be bound on {} (tried {:?})",
                ip,
                config.http_ports
            ));
        }

        if let Some(acceptor) = tls {
            for port in &config.https_ports {
                match TcpListener::bind(SocketAddr::new(ip, *port)).await {
                    Ok(inner) => {
                        info!(bind_address = %inner.local_addr()?, "HTTPS listener bound");
                        listeners.push(Listener {
                            inner,
                            tls: Some(acceptor.clone()),
                        });
                    }
                    Err(e) => warn!(port, error = %e, "HTTPS port unavailable, skipping"),
                }
            }
        }

        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        Ok(Self {
            listeners,
            max_connections: config.max_connections.max(1),
            request_timeout,
            response_budget: request_timeout,
            drain_timeout,
        })
    }

    /// How long a handler may take once the request has been read. The
    /// request timeout only bounds receiving the request; a handler that
    /// joins an upstream network needs at least the connect timeout here.
    pub fn with_response_budget(mut self, budget: Duration) -> Self {
        self.response_budget = budget;
        self
    }

    /// Upper bound on how long [`run`](Self::run) takes to return once
    /// shutdown is requested.
    pub fn stop_budget(&self) -> Duration {
        self.drain_timeout + CUTOFF_GRACE
    }

    pub fn http_addrs(&self) -> Vec<SocketAddr> {
        self.addrs(false)
    }

    pub fn https_addrs(&self) -> Vec<SocketAddr> {
        self.addrs(true)
    }

    fn addrs(&self, secure: bool) -> Vec<SocketAddr> {
        self.listeners
            .iter()
            .filter(|l| l.tls.is_some() == secure)
            .filter_map(|l| l.inner.local_addr().ok())
            .collect()
    }

    /// Serves until `shutdown` fires, then waits up to the drain timeout for
    /// in-flight connections. Idle connections are closed straight away and
    /// whatever is still open when the drain runs out is cut off.
    pub async fn run(self, app: Router, shutdown: CancellationToken) {
        let tracker = TaskTracker::new();
        let cutoff = CancellationToken::new();
        let ctx = Arc::new(ConnectionContext {
            app,
            limiter: Arc::new(Semaphore::new(self.max_connections)),
            request_timeout: self.request_timeout,
            response_budget: self.response_budget,
            tracker: tracker.clone(),
            shutdown: shutdown.clone(),
            cutoff: cutoff.clone(),
        });

        for listener in self.listeners {
            tracker.spawn(accept_loop(listener, ctx.clone()));
        }

        shutdown.cancelled().await;
        tracker.close();
        if timeout(self.drain_timeout, tracker.wait()).await.is_err() {
            warn!(
                open = tracker.len(),
                "HTTP connections still open after drain timeout, cutting them off"
            );
            cutoff.cancel();
            if timeout(CUTOFF_GRACE, tracker.wait()).await.is_err() {
                warn!(open = tracker.len(), "HTTP connections ignored cutoff");
            }
        }
        info!("HTTP dispatcher stopped");
    }
}

async fn accept_loop(listener: Listener, ctx: Arc<ConnectionContext>) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = ctx.shutdown.cancelled() => break,
            accepted = listener.inner.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    continue;
                }
            },
        };

        let permit = ctx.limiter.clone().try_acquire_owned().ok();
        let tls = listener.tls.clone();
        let conn_ctx = ctx.clone();
        ctx.tracker.spawn(async move {
            let handled = async {
                match tls {
                    None => serve_stream(stream, peer, permit, &conn_ctx).await,
                    Some(acceptor) => {
                        match timeout(conn_ctx.request_timeout, acceptor.accept(stream)).await {
                            Ok(Ok(stream)) => serve_stream(stream, peer, permit, &conn_ctx).await,
                            Ok(Err(e)) => debug!(peer = %peer, error = %e, "TLS handshake failed"),
                            Err(_) => debug!(peer = %peer, "TLS handshake timed out"),
                        }
                    }
                }
            };
            tokio::select! {
                _ = handled => {}
                _ = conn_ctx.cutoff.cancelled() => debug!(peer = %peer, "Connection cut off at shutdown"),
            }
        });
    }
}

async fn serve_stream<S>(
    mut stream: S,
    peer: SocketAddr,
    permit: Option<OwnedSemaphorePermit>,
    ctx: &ConnectionContext,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let Some(_permit) = permit else {
        warn!(peer = %peer, "Connection limit reached, rejecting");
        let mut scratch = [0u8; 1024];
        let _ = timeout(BUSY_READ_WAIT, stream.read(&mut scratch)).await;
        let _ = stream.write_all(busy_response().as_bytes()).await;
        let _ = stream.shutdown().await;
        return;
    };

    let app = ctx.app.clone();
    let service = service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(peer));
        app.clone().oneshot(request)
    });

    // The header timeout covers a client that connects and stays silent;
    // the overall deadline also leaves room for a slow handler.
    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(ctx.request_timeout)
        .keep_alive(false)
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let deadline = Instant::now() + ctx.request_timeout + ctx.response_budget;
    let mut draining = false;
    loop {
        tokio::select! {
            result = connection.as_mut() => {
                if let Err(e) = result {
                    debug!(peer = %peer, error = %e, "HTTP connection error");
                }
                break;
            }
            _ = ctx.shutdown.cancelled(), if !draining => {
                draining = true;
                connection.as_mut().graceful_shutdown();
            }
            _ = sleep_until(deadline) => {
                debug!(peer = %peer, "HTTP connection timed out");
                break;
            }
        }
    }
}

fn busy_response() -> String {
    format!(
        "HTTP/1.1 503 Service Unavailable\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        BUSY_BODY.len(),
        BUSY_BODY
    )
}
