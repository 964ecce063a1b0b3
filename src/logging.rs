use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// How much the process should log to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Nothing unless `RUST_LOG` asks for it (full-screen terminal view).
    Silent,
    Normal,
    Verbose,
}

impl LogLevel {
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Silent => "gorda=off",
            LogLevel::Normal => "gorda=info",
            LogLevel::Verbose => "gorda=debug",
        }
    }
}

/// Build the filter: a usable `RUST_LOG` wins outright, otherwise `level` applies.
pub fn build_filter(level: LogLevel, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.directive()))
}

/// Install the global stderr subscriber.
pub fn init_logging(level: LogLevel) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, rust_log.as_deref());

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::Directive;

    #[test]
    fn test_directives_parse() {
        for level in [LogLevel::Silent, LogLevel::Normal, LogLevel::Verbose] {
            assert!(level.directive().parse::<Directive>().is_ok());
        }
    }

    #[test]
    fn test_rust_log_overrides_level() {
        let filter = build_filter(LogLevel::Normal, Some("gorda=debug"));
        assert_eq!(filter.to_string(), "gorda=debug");

        // The watch view stays quiet only when nothing was asked for
        let filter = build_filter(LogLevel::Silent, Some("gorda=trace"));
        assert_eq!(filter.to_string(), "gorda=trace");
    }

    #[test]
    fn test_level_applies_without_rust_log() {
        assert_eq!(build_filter(LogLevel::Verbose, None).to_string(), "gorda=debug");
        assert_eq!(build_filter(LogLevel::Silent, Some("  ")).to_string(), "gorda=off");
    }
}
