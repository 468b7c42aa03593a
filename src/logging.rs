//! Logging initialisation.

use machinewatch_settings::{LogFormat, LoggingSettings};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.level.to_ascii_lowercase()))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(fmt::layer().with_writer(std::io::stdout).compact())
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stdout).json())
            .try_init()?,
    }

    tracing::debug!("Logging initialised ({})", settings.format);
    Ok(())
}
