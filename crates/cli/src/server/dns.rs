use anyhow::Context;
use captive_portal_infrastructure::dns::SpoofingHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const RECV_BUFFER_SIZE: usize = 1500;
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(60);

/// Owns the UDP socket that answers every query with the portal address.
/// Dropping the responder releases the port.
pub struct DnsResponder {
    socket: UdpSocket,
    handler: Arc<SpoofingHandler>,
    liveness_interval: Duration,
}

impl DnsResponder {
    pub fn bind(addr: SocketAddr, handler: Arc<SpoofingHandler>) -> anyhow::Result<Self> {
        let socket = create_udp_socket(addr)
            .with_context(|| format!("binding DNS responder on {}", addr))?;
        info!(bind_address = %socket.local_addr()?, portal_ip = %handler.portal_ip(), "DNS responder bound");
        Ok(Self {
            socket,
            handler,
            liveness_interval: LIVENESS_INTERVAL,
        })
    }

    pub fn with_liveness_interval(mut self, interval: Duration) -> Self {
        self.liveness_interval = interval;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let mut liveness = interval_at(
            Instant::now() + self.liveness_interval,
            self.liveness_interval,
        );
        liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = liveness.tick() => {
                    let stats = self.handler.stats();
                    info!(answered = stats.answered, dropped = stats.dropped, "DNS responder alive");
                }
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => self.respond(&buf[..len], peer).await,
                    Err(e) if is_transient(&e) => continue,
                    Err(e) => warn!(error = %e, "DNS receive failed"),
                },
            }
        }

        info!("DNS responder stopped");
    }

    async fn respond(&self, datagram: &[u8], peer: SocketAddr) {
        let Some(reply) = self.handler.handle(datagram) else {
            debug!(peer = %peer, len = datagram.len(), "Dropped DNS datagram");
            return;
        };
        match self.socket.send_to(&reply, peer).await {
            Ok(_) => {}
            Err(e) if is_transient(&e) => {}
            Err(e) => warn!(peer = %peer, error = %e, "DNS reply failed"),
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::ConnectionReset
    )
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
