//! Client Configuration Settings
//!
//! Connection and adapter settings, loaded from environment variables or a
//! `.env` file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::application::services::{AdapterSettings, DEFAULT_CHANNEL_SIZE, MAX_CHANNEL_SIZE};
use crate::domain::classify::ReadFailurePolicy;

/// Environment variable holding the service endpoint.
pub const ENDPOINT_VAR: &str = "ODDS_WAREHOUSE_ENDPOINT";

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service endpoint URI, e.g. `http://localhost:50051`.
    pub endpoint: String,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Deadline attached to every streaming call (`None` = no deadline).
    pub request_timeout: Option<Duration>,
    /// TCP keepalive interval (`None` = disabled).
    pub tcp_keepalive: Option<Duration>,
    /// Default item channel capacity for `stream_*` calls, at most
    /// `MAX_CHANNEL_SIZE`.
    pub channel_size: usize,
    /// Classification of read failures in `fetch_*` calls.
    pub read_failure: ReadFailurePolicy,
}

impl ClientConfig {
    /// Configuration for `endpoint` with every other setting at its default.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::from_millis(5000),
            request_timeout: None,
            tcp_keepalive: Some(Duration::from_secs(15)),
            channel_size: DEFAULT_CHANNEL_SIZE,
            read_failure: ReadFailurePolicy::Internal,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply a `.env` file from the working directory if present, then read
    /// the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file applied");
        }
        Self::from_env()
    }

    /// Read settings from a `.env` file, falling back to the process
    /// environment for keys the file does not set. The process environment
    /// is left untouched.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = dotenvy::from_path_iter(path.as_ref())?
            .collect::<Result<HashMap<String, String>, _>>()?;

        Self::from_lookup(|key| file.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_VAR)
            .ok_or_else(|| ConfigError::MissingEnvVar(ENDPOINT_VAR.to_string()))?;

        if endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyValue(ENDPOINT_VAR.to_string()));
        }

        let defaults = Self::new(endpoint.trim());

        let connect_timeout = parse_u64(&lookup, "ODDS_WAREHOUSE_CONNECT_TIMEOUT_MS")
            .map_or(defaults.connect_timeout, Duration::from_millis);

        let request_timeout = match parse_u64(&lookup, "ODDS_WAREHOUSE_REQUEST_TIMEOUT_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        let tcp_keepalive = match parse_u64(&lookup, "ODDS_WAREHOUSE_TCP_KEEPALIVE_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.tcp_keepalive,
        };

        let channel_size = parse_u64(&lookup, "ODDS_WAREHOUSE_CHANNEL_SIZE")
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .map_or(defaults.channel_size, |v| v.min(MAX_CHANNEL_SIZE));

        let read_failure = lookup("ODDS_WAREHOUSE_STREAM_READ_POLICY")
            .map(|s| ReadFailurePolicy::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Ok(Self {
            connect_timeout,
            request_timeout,
            tcp_keepalive,
            channel_size,
            read_failure,
            ..defaults
        })
    }

    /// Adapter settings derived from this configuration.
    #[must_use]
    pub const fn adapter_settings(&self) -> AdapterSettings {
        AdapterSettings {
            read_failure: self.read_failure,
            channel_size: self.channel_size,
        }
    }

    /// Whether the endpoint requires TLS.
    #[must_use]
    pub fn uses_tls(&self) -> bool {
        self.endpoint.starts_with("https://")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// The `.env` file could not be read or parsed.
    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

fn parse_u64<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_endpoint() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == ENDPOINT_VAR));
    }

    #[test]
    fn empty_endpoint() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENDPOINT_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test]
    fn defaults_when_only_endpoint_set() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(ENDPOINT_VAR, "http://localhost:50051")]))
                .unwrap();

        assert_eq!(config, ClientConfig::new("http://localhost:50051"));
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.tcp_keepalive, Some(Duration::from_secs(15)));
        assert_eq!(config.channel_size, DEFAULT_CHANNEL_SIZE);
        assert_eq!(config.read_failure, ReadFailurePolicy::Internal);
        assert!(!config.uses_tls());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENDPOINT_VAR, "https://odds.example.com"),
            ("ODDS_WAREHOUSE_CONNECT_TIMEOUT_MS", "250"),
            ("ODDS_WAREHOUSE_REQUEST_TIMEOUT_SECS", "30"),
            ("ODDS_WAREHOUSE_TCP_KEEPALIVE_SECS", "0"),
            ("ODDS_WAREHOUSE_CHANNEL_SIZE", "64"),
            ("ODDS_WAREHOUSE_STREAM_READ_POLICY", "stream_failure"),
        ]))
        .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.tcp_keepalive, None);
        assert_eq!(config.channel_size, 64);
        assert_eq!(config.read_failure, ReadFailurePolicy::StreamFailure);
        assert!(config.uses_tls());

        let settings = config.adapter_settings();
        assert_eq!(settings.channel_size, 64);
        assert_eq!(settings.read_failure, ReadFailurePolicy::StreamFailure);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENDPOINT_VAR, "http://localhost:50051"),
            ("ODDS_WAREHOUSE_CONNECT_TIMEOUT_MS", "soon"),
            ("ODDS_WAREHOUSE_CHANNEL_SIZE", "0"),
        ]))
        .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.channel_size, DEFAULT_CHANNEL_SIZE);
    }

    #[test]
    fn oversized_channel_size_is_capped() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENDPOINT_VAR, "http://localhost:50051"),
            ("ODDS_WAREHOUSE_CHANNEL_SIZE", "18446744073709551615"),
        ]))
        .unwrap();

        assert_eq!(config.channel_size, MAX_CHANNEL_SIZE);
    }

    #[test]
    fn env_file_is_read_without_touching_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ODDS_WAREHOUSE_ENDPOINT=http://warehouse.test:50051").unwrap();
        writeln!(file, "ODDS_WAREHOUSE_CHANNEL_SIZE=128").unwrap();

        let config = ClientConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://warehouse.test:50051");
        assert_eq!(config.channel_size, 128);
    }

    #[test]
    fn env_file_missing_is_an_error() {
        let err = ClientConfig::from_env_file("/nonexistent/odds-warehouse/.env").unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }
}
