use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

const FALLBACK_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; an unparsable
/// configured level falls back to `info`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| build_filter(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init()?,
    }

    tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");

    Ok(())
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let filter = build_filter("debug");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_build_filter_falls_back_on_garbage() {
        let filter = build_filter("user_directory=notalevel");
        assert_eq!(filter.to_string(), FALLBACK_LEVEL);
    }
}
