//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for PONCHO_QUIET, PONCHO_LOG_LEVEL, PONCHO_LOG_JSON.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `quiet` is set: only WARN and above.
const QUIET_FILTER: &str = "poncho=warn,poncho_env=warn";

/// Initialize tracing. Call at process startup.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(cfg: &ObservabilityConfig) {
    let level = filter_directive(cfg);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}

fn filter_directive(cfg: &ObservabilityConfig) -> &str {
    if cfg.quiet {
        QUIET_FILTER
    } else {
        &cfg.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_overrides_level() {
        let cfg = ObservabilityConfig {
            quiet: true,
            log_level: "poncho=debug".to_string(),
            log_json: false,
        };
        assert_eq!(filter_directive(&cfg), QUIET_FILTER);
    }

    #[test]
    fn test_level_used_when_not_quiet() {
        let cfg = ObservabilityConfig {
            quiet: false,
            log_level: "poncho=debug".to_string(),
            log_json: false,
        };
        assert_eq!(filter_directive(&cfg), "poncho=debug");
    }
}
