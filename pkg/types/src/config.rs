use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use pkg_constants::runtime::{DEFAULT_RECONCILE_INTERVAL_SECS, RECONCILE_INTERVAL_ENV};

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 8444
/// data-dir: /var/lib/schedscale/data
/// reconcile-interval: 10s
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "data-dir")]
    pub data_dir: Option<String>,
    #[serde(default, alias = "reconcile-interval")]
    pub reconcile_interval: Option<String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Parse a duration string of the form `<number><unit>`, where unit is one
/// of `ms`, `s`, `m`, `h`. Anything else yields `None`.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let unit_start = s.find(|c: char| !c.is_ascii_digit())?;
    let (number, unit) = s.split_at(unit_start);
    let n: u64 = number.parse().ok()?;
    match unit {
        "ms" => Some(Duration::from_millis(n)),
        "s" => Some(Duration::from_secs(n)),
        "m" => Some(Duration::from_secs(n * 60)),
        "h" => Some(Duration::from_secs(n * 3600)),
        _ => None,
    }
}

/// Resolve the reconcile interval: explicit configuration beats the
/// `RECONCILE_INTERVAL` environment variable, which beats the default.
/// A malformed or zero value is reported and replaced by the default
/// rather than producing an immediate-retrigger loop.
pub fn reconcile_interval(configured: Option<&str>) -> Duration {
    let default = Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS);
    let raw = match configured
        .map(str::to_owned)
        .or_else(|| std::env::var(RECONCILE_INTERVAL_ENV).ok())
    {
        Some(r) if !r.trim().is_empty() => r,
        _ => return default,
    };
    match parse_duration(&raw) {
        Some(d) if !d.is_zero() => d,
        _ => {
            error!(
                "Invalid reconcile interval '{}', falling back to {}s",
                raw, DEFAULT_RECONCILE_INTERVAL_SECS
            );
            default
        }
    }
}
