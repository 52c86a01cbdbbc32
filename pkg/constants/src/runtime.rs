//! Controller runtime constants.

/// Environment variable overriding the reconcile interval (e.g. "10s", "2m").
pub const RECONCILE_INTERVAL_ENV: &str = "RECONCILE_INTERVAL";

/// Reconcile interval used when no override is configured, in seconds.
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 10;
