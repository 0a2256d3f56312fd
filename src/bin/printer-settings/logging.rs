//! Logging setup for the CLI. The library only emits `tracing` events;
//! installing a subscriber is left to whoever embeds it.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use printer_settings::error::PluginError;

/// Pick the filter directive: CLI flags win, then the configured level.
pub fn level_for(verbose: bool, quiet: bool, configured: Option<&str>) -> &str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured.unwrap_or("info")
    }
}

/// Install a compact stderr subscriber. `RUST_LOG` overrides `level`.
pub fn init(level: &str) -> Result<(), PluginError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| PluginError::Config {
            message: format!("invalid log level '{level}': {e}"),
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| PluginError::Config {
            message: format!("failed to initialize logger: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configured_level() {
        assert_eq!(level_for(false, true, Some("trace")), "error");
        assert_eq!(level_for(true, false, Some("warn")), "debug");
        assert_eq!(level_for(false, false, Some("warn")), "warn");
        assert_eq!(level_for(false, false, None), "info");
    }
}
