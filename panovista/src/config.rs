//! Runtime configuration.
//!
//! Tunables for network behavior and traversal pacing, with defaults
//! as named constants so the CLI and tests reference one source.

use std::time::Duration;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default retry attempts per transiently failing tile fetch.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default concurrent tile fetches within one panorama (sequential).
pub const DEFAULT_FETCH_WORKERS: usize = 1;

/// Default pause between batch items in seconds.
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 2;

/// Default distance between area-scan sample points in meters.
///
/// A coverage/duplicate-lookup trade-off: street capture points sit
/// roughly 10 m apart, and deduplication makes over-sampling cost only
/// metadata lookups, never repeat downloads.
pub const DEFAULT_SCAN_STEP_METERS: f64 = 10.0;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Retry attempts per transiently failing tile
    pub max_retries: u32,
    /// Concurrent tile fetches within one panorama
    pub fetch_workers: usize,
    /// Pause between batch items
    pub batch_delay: Duration,
    /// Distance between area-scan sample points in meters
    pub scan_step_meters: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            fetch_workers: DEFAULT_FETCH_WORKERS,
            batch_delay: Duration::from_secs(DEFAULT_BATCH_DELAY_SECS),
            scan_step_meters: DEFAULT_SCAN_STEP_METERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.fetch_workers, 1);
        assert_eq!(config.batch_delay, Duration::from_secs(2));
        assert!((config.scan_step_meters - 10.0).abs() < f64::EPSILON);
    }
}
