use captive_portal_domain::Config;
use tracing_subscriber::EnvFilter;

const QUIET_DEPENDENCIES: [&str; 2] = ["hyper=warn", "rustls=warn"];

/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_logging(config: &Config) {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    for directive in QUIET_DEPENDENCIES {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
