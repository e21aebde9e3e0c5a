use captive_portal::{appliance, bootstrap};
use captive_portal_domain::{CliOverrides, ConfigOrigin};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "captive-portal")]
#[command(version)]
#[command(about = "Captive portal appliance - DNS spoofing, portal web server and Wi-Fi management")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// HTTP port (replaces the configured list)
    #[arg(short = 'p', long)]
    http_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Directory holding the portal pages
    #[arg(long, value_name = "DIR")]
    www: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        http_port: cli.http_port,
        bind_address: cli.bind,
        web_root: cli.www,
        log_level: cli.log_level,
    };

    let loaded = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&loaded.config);

    info!("Starting captive portal v{}", env!("CARGO_PKG_VERSION"));
    match loaded.origin {
        ConfigOrigin::File => info!(path = %loaded.path, "Configuration loaded"),
        ConfigOrigin::DefaultsWritten => {
            warn!(path = %loaded.path, "Configuration missing or malformed, defaults written")
        }
    }

    if let Err(e) = appliance::run(loaded.config).await {
        error!(error = format!("{:#}", e), "Appliance stopped with an error");
        return Err(e);
    }

    info!("Captive portal shutdown complete");
    Ok(())
}
