//! Tracing setup for processes that embed the lifecycle coordinators.
//!
//! The coordinators only emit `tracing` events. Hosts without a subscriber of
//! their own call [`init`] once at startup to print them.

use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;

/// Environment variable holding the level filter
pub const LOG_ENV: &str = "LIFECYCLE_LOG";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Level filter for `raw`; unset or unrecognized values mean `info`
fn level_filter(raw: Option<&str>) -> LevelFilter {
    match raw.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        Some("off") => LevelFilter::OFF,
        Some("trace") => LevelFilter::TRACE,
        Some("debug") => LevelFilter::DEBUG,
        Some("warn") => LevelFilter::WARN,
        Some("error") => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Print lifecycle events to stderr at the level named by `LIFECYCLE_LOG`.
///
/// Only the first call does anything. Returns whether that call installed the
/// subscriber; `false` means another global subscriber was already set.
pub fn init() -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = level_filter(std::env::var(LOG_ENV).ok().as_deref());
        tracing_subscriber::fmt()
            .with_max_level(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_known_values() {
        assert_eq!(level_filter(Some("trace")), LevelFilter::TRACE);
        assert_eq!(level_filter(Some(" DEBUG ")), LevelFilter::DEBUG);
        assert_eq!(level_filter(Some("warn")), LevelFilter::WARN);
        assert_eq!(level_filter(Some("error")), LevelFilter::ERROR);
        assert_eq!(level_filter(Some("off")), LevelFilter::OFF);
    }

    #[test]
    fn test_level_filter_falls_back_to_info() {
        assert_eq!(level_filter(None), LevelFilter::INFO);
        assert_eq!(level_filter(Some("verbose")), LevelFilter::INFO);
    }

    #[test]
    fn test_repeated_init_reports_first_outcome() {
        let first = init();
        assert_eq!(init(), first);
        assert_eq!(INSTALLED.get(), Some(&first));
    }
}
