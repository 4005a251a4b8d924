use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Filter directive used when `RUST_LOG` is unset or invalid.
const DEFAULT_DIRECTIVE: &str = "info";

/// Build the log filter from an optional `RUST_LOG`-style directive.
///
/// Falls back to `"info"` when the directive is absent or does not parse.
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Initialise the global `tracing` subscriber.
///
/// Log lines go to stderr so that stdout carries only the progress report.
pub fn setup_logging() -> anyhow::Result<()> {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(directive.as_deref());

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_default() {
        assert_eq!(build_filter(None).to_string(), "info");
    }

    #[test]
    fn test_build_filter_explicit() {
        assert_eq!(build_filter(Some("debug")).to_string(), "debug");
    }

    #[test]
    fn test_build_filter_per_target() {
        let filter = build_filter(Some("livestat_data=trace"));
        assert_eq!(filter.to_string(), "livestat_data=trace");
    }

    #[test]
    fn test_build_filter_invalid_falls_back() {
        assert_eq!(build_filter(Some("livestat=loud")).to_string(), "info");
    }
}
