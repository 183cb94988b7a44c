//! Tracing initialization

use crate::config::EditorConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init(config: &EditorConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        Registry::default()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .try_init()?;
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "spoke starting");
    Ok(())
}

/// Log the effective configuration
pub fn log_config(config: &EditorConfig) {
    tracing::info!(
        asset_root = %config.asset_root.display(),
        cache_capacity_bytes = config.cache_capacity_bytes,
        max_texture_dimension = config.issues.max_texture_dimension,
        max_file_bytes = config.issues.max_file_bytes,
        "configuration loaded"
    );
}
