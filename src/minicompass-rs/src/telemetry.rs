//! Console logging setup for applications embedding the client
//!
//! The library itself only emits `tracing` events; nothing is printed until an
//! application installs a subscriber, for example with [`init_telemetry`].

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "minicompass_rs=info,minicompass_core=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TelemetryFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Fails if a global subscriber is already set.
pub fn init_telemetry(format: TelemetryFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        TelemetryFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?,
        TelemetryFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
            .try_init()?,
    }

    tracing::info!(?format, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        assert!(init_telemetry(TelemetryFormat::Json).is_ok());
        assert!(init_telemetry(TelemetryFormat::Pretty).is_err());
    }
}
