//! Brings the appliance up in order, runs its tasks side by side and tears
//! them down again within a bounded time.

use anyhow::Context;
use captive_portal_api::{create_portal_routes, AppState};
use captive_portal_application::ports::{Watchdog, WirelessRadio};
use captive_portal_application::services::{
    InterfaceManager, InterfaceTimings, RoleConfig, StationSettings,
};
use captive_portal_domain::client_side::network_for;
use captive_portal_domain::{Config, SubnetClassifier};
use captive_portal_infrastructure::assets::FsAssetStore;
use captive_portal_infrastructure::dns::SpoofingHandler;
use captive_portal_infrastructure::system::SoftwareWatchdog;
use captive_portal_jobs::{HealthCheckJob, JobRunner, WatchdogFeedJob};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::di::{build_radio, UseCases};
use crate::server::{load_tls_acceptor, DnsResponder, HttpDispatcher};

/// Headroom on top of a task's own stop budget before it gets aborted.
const STOP_SLACK: Duration = Duration::from_millis(250);

pub struct Appliance {
    config: Config,
    radio: Option<Arc<dyn WirelessRadio>>,
}

struct Task {
    name: &'static str,
    handle: JoinHandle<()>,
    stop_budget: Duration,
}

/// A started appliance. Dropping it without calling
/// [`shutdown`](Self::shutdown) leaves its tasks running.
pub struct RunningAppliance {
    dns_addr: SocketAddr,
    http_addrs: Vec<SocketAddr>,
    https_addrs: Vec<SocketAddr>,
    interfaces: Arc<InterfaceManager>,
    shutdown: CancellationToken,
    tasks: Vec<Task>,
    watchdog: Option<Arc<SoftwareWatchdog>>,
}

impl Appliance {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            radio: None,
        }
    }

    pub fn with_radio(mut self, radio: Arc<dyn WirelessRadio>) -> Self {
        self.radio = Some(radio);
        self
    }

    pub async fn start(self) -> anyhow::Result<RunningAppliance> {
        let config = self.config;
        let radio = match self.radio {
            Some(radio) => radio,
            None => build_radio(&config.radio)?,
        };

        let interfaces = Arc::new(InterfaceManager::new(
            radio,
            InterfaceTimings::from_config(&config.interfaces),
        ));

        let ap_settings = config.access_point_settings()?;
        interfaces
            .start(RoleConfig::AccessPoint(ap_settings.clone()))
            .await
            .context("access point failed to start")?;

        let station = StationSettings {
            credentials: config.station.credentials(),
            ip: config.station.ip_config()?,
        };
        if let Err(e) = interfaces.start(RoleConfig::Station(station.clone())).await {
            warn!(error = %e, "Station did not come up, continuing with the access point only");
        }

        let portal_ip = config.access_point.portal_ip()?;
        let bind_ip: IpAddr = config
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address {}", config.server.bind_address))?;
        let drain_timeout = Duration::from_secs(config.shutdown.drain_timeout_secs);

        let dns = DnsResponder::bind(
            SocketAddr::new(bind_ip, config.server.dns_port),
            Arc::new(SpoofingHandler::new(portal_ip)),
        )?;
        let dns_addr = dns.local_addr()?;

        let tls = load_tls_acceptor(&config.tls);
        let dispatcher = HttpDispatcher::bind(&config.server, tls, drain_timeout)
            .await?
            .with_response_budget(Duration::from_millis(config.interfaces.connect_timeout_ms));
        let http_stop_budget = dispatcher.stop_budget();
        let http_addrs = dispatcher.http_addrs();
        let https_addrs = dispatcher.https_addrs();

        let mut classifier =
            SubnetClassifier::from_address(ap_settings.address, ap_settings.netmask)
                .map_err(anyhow::Error::msg)?;
        if let Some(ip) = station.ip {
            classifier = classifier
                .with_station_network(network_for(ip.address, ip.netmask).map_err(anyhow::Error::msg)?);
        }

        let use_cases = UseCases::new(interfaces.clone());
        let state = AppState {
            scan_networks: use_cases.scan_networks,
            connect_station: use_cases.connect_station,
            get_status: use_cases.get_status,
            assets: Arc::new(FsAssetStore::new(&config.server.web_root)),
            classifier: Arc::new(classifier),
            portal_ip,
            tls_active: !https_addrs.is_empty(),
        };
        let app = create_portal_routes(state);

        let shutdown = CancellationToken::new();
        let mut tasks = vec![
            Task {
                name: "dns",
                handle: tokio::spawn(dns.run(shutdown.clone())),
                stop_budget: drain_timeout,
            },
            Task {
                name: "http",
                handle: tokio::spawn(dispatcher.run(app, shutdown.clone())),
                stop_budget: http_stop_budget,
            },
        ];

        let mut jobs = JobRunner::new()
            .with_health_check(
                HealthCheckJob::new(interfaces.clone()).with_interval(Duration::from_secs(
                    config.interfaces.health_check_interval_secs,
                )),
            )
            .with_shutdown_token(shutdown.clone());

        let watchdog = if config.watchdog.enabled {
            let watchdog = SoftwareWatchdog::start(Duration::from_secs(config.watchdog.timeout_secs));
            let port: Arc<dyn Watchdog> = watchdog.clone();
            jobs = jobs.with_watchdog_feed(
                WatchdogFeedJob::new(port)
                    .with_interval(Duration::from_secs(config.watchdog.feed_interval_secs)),
            );
            Some(watchdog)
        } else {
            None
        };

        tasks.extend(jobs.start().into_iter().map(|job| Task {
            name: job.name,
            handle: job.handle,
            stop_budget: drain_timeout,
        }));

        info!(
            dns = %dns_addr,
            http = ?http_addrs,
            https = ?https_addrs,
            portal_ip = %portal_ip,
            "Captive portal running"
        );

        Ok(RunningAppliance {
            dns_addr,
            http_addrs,
            https_addrs,
            interfaces,
            shutdown,
            tasks,
            watchdog,
        })
    }
}

impl RunningAppliance {
    pub fn dns_addr(&self) -> SocketAddr {
        self.dns_addr
    }

    pub fn http_addrs(&self) -> &[SocketAddr] {
        &self.http_addrs
    }

    pub fn https_addrs(&self) -> &[SocketAddr] {
        &self.https_addrs
    }

    pub fn interfaces(&self) -> &Arc<InterfaceManager> {
        &self.interfaces
    }

    /// Cancels every task, giving each its stop budget to finish before it is
    /// aborted, then powers the radios down.
    pub async fn shutdown(self) {
        info!("Shutting down");
        self.shutdown.cancel();

        for mut task in self.tasks {
            match tokio::time::timeout(task.stop_budget + STOP_SLACK, &mut task.handle).await {
                Ok(Ok(())) => info!(task = task.name, "Task stopped"),
                Ok(Err(e)) => error!(task = task.name, error = %e, "Task ended abnormally"),
                Err(_) => {
                    warn!(task = task.name, "Task did not stop in time, aborting");
                    task.handle.abort();
                }
            }
        }

        self.interfaces.stop_all().await;

        if let Some(watchdog) = self.watchdog {
            watchdog.disarm();
        }
    }
}

/// Starts the appliance and serves until Ctrl-C or SIGTERM.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let running = Appliance::new(config).start().await?;
    wait_for_signal().await;
    running.shutdown().await;
    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "SIGTERM handler unavailable"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }
}
