//! Configuration management for the server.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Remote endpoint polled when `SYNC_URL` is not set.
pub const DEFAULT_SYNC_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Remote sync settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Whether the periodic sync runs at all
    pub enabled: bool,
    /// Endpoint returning the remote quote list
    pub url: String,
    /// Time between sync cycles
    pub interval: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the persisted quotes and selection
    pub data_dir: PathBuf,
    /// Remote sync settings
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let enabled = match lookup("SYNC_ENABLED").as_deref() {
            None => true,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(_) => return Err(ConfigError::InvalidValue("SYNC_ENABLED")),
        };

        let url = lookup("SYNC_URL").unwrap_or_else(|| DEFAULT_SYNC_URL.to_string());
        let interval = seconds(&lookup, "SYNC_INTERVAL_SECS", 60)?;
        let timeout = seconds(&lookup, "SYNC_TIMEOUT_SECS", 10)?;

        Ok(Self {
            host,
            port,
            data_dir,
            sync: SyncConfig {
                enabled,
                url,
                interval,
                timeout,
            },
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = match lookup(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(key))?,
        None => default,
    };

    if secs == 0 {
        return Err(ConfigError::InvalidValue(key));
    }

    Ok(Duration::from_secs(secs))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid {0} value")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.sync.enabled);
        assert_eq!(config.sync.url, DEFAULT_SYNC_URL);
        assert_eq!(config.sync.interval, Duration::from_secs(60));
        assert_eq!(config.sync.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/var/lib/quotebook"),
            ("SYNC_ENABLED", "false"),
            ("SYNC_URL", "http://localhost:9000/quotes"),
            ("SYNC_INTERVAL_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/quotebook"));
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.url, "http://localhost:9000/quotes");
        assert_eq!(config.sync.interval, Duration::from_secs(5));
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort)
        ));
        assert!(matches!(
            config_from(&[("SYNC_INTERVAL_SECS", "0")]),
            Err(ConfigError::InvalidValue("SYNC_INTERVAL_SECS"))
        ));
        assert!(matches!(
            config_from(&[("SYNC_ENABLED", "maybe")]),
            Err(ConfigError::InvalidValue("SYNC_ENABLED"))
        ));
    }
}
