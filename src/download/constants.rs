//! Constants for the download module (timeouts, concurrency bounds).

/// Default HTTP connect timeout for image downloads (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default total request timeout for image downloads (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default number of downloads in flight.
pub const DEFAULT_CONCURRENCY: usize = 10;
