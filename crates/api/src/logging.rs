use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// `RUST_LOG` wins over the configured level; unknown levels fall back to info.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init()?,
        _ => registry.with(fmt::layer()).try_init()?,
    }

    tracing::info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
