//! Configuration data model and validation

use crate::defaults;
use crate::logging::LogLevel;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service under load; the request path is appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of rounds to run
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Concurrent requests fired in each round
    #[serde(default = "default_requests_per_round")]
    pub requests_per_round: u32,

    /// Pause between the end of one round and the start of the next
    #[serde(default = "default_round_delay_ms")]
    pub round_delay_ms: u64,

    /// Requests strictly slower than this count as slow
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print one line per request
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Explicit logger level, overriding the verbose/debug mapping
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            rounds: default_rounds(),
            requests_per_round: default_requests_per_round(),
            round_delay_ms: default_round_delay_ms(),
            slow_threshold_ms: default_slow_threshold_ms(),
            timeout_seconds: default_timeout_secs(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }

    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }

    /// Parse the base URL, rejecting anything that is not an absolute http(s) URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        let parsed = Url::parse(self.base_url.trim())
            .map_err(|e| AppError::config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::config(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(AppError::config(format!("Base URL '{}' has no host", self.base_url)));
        }

        Ok(parsed)
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;

        if self.rounds == 0 {
            return Err(AppError::config("Rounds must be greater than 0"));
        }

        if self.rounds > defaults::MAX_ROUNDS {
            return Err(AppError::config(format!("Rounds cannot exceed {}", defaults::MAX_ROUNDS)));
        }

        if self.requests_per_round == 0 {
            return Err(AppError::config("Requests per round must be greater than 0"));
        }

        if self.requests_per_round > defaults::MAX_REQUESTS_PER_ROUND {
            return Err(AppError::config(format!(
                "Requests per round cannot exceed {}",
                defaults::MAX_REQUESTS_PER_ROUND
            )));
        }

        if self.round_delay_ms > defaults::MAX_ROUND_DELAY_MS {
            return Err(AppError::config(format!(
                "Round delay cannot exceed {}ms",
                defaults::MAX_ROUND_DELAY_MS
            )));
        }

        if self.slow_threshold_ms == 0 {
            return Err(AppError::config("Slow threshold must be greater than 0"));
        }

        if self.slow_threshold_ms > defaults::MAX_SLOW_THRESHOLD_MS {
            return Err(AppError::config(format!(
                "Slow threshold cannot exceed {}ms",
                defaults::MAX_SLOW_THRESHOLD_MS
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > defaults::MAX_TIMEOUT_SECS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                defaults::MAX_TIMEOUT_SECS
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("LOAD_BASE_URL") {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                self.base_url = base_url.to_string();
            }
        }

        if let Some(rounds) = env_value("LOAD_ROUNDS")? {
            self.rounds = rounds;
        }

        if let Some(requests) = env_value("LOAD_REQUESTS")? {
            self.requests_per_round = requests;
        }

        if let Some(delay) = env_value("LOAD_DELAY_MS")? {
            self.round_delay_ms = delay;
        }

        if let Some(threshold) = env_value("LOAD_SLOW_THRESHOLD_MS")? {
            self.slow_threshold_ms = threshold;
        }

        if let Some(timeout) = env_value("LOAD_TIMEOUT_SECONDS")? {
            self.timeout_seconds = timeout;
        }

        if let Some(enable_color) = env_value("ENABLE_COLOR")? {
            self.enable_color = enable_color;
        }

        if let Some(level) = env_value::<LogLevel>("LOG_LEVEL")? {
            self.log_level = Some(level);
        }

        Ok(())
    }
}

/// Read and parse an environment variable; unset or blank yields `None`
fn env_value<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, raw, e))),
        _ => Ok(None),
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    defaults::DEFAULT_BASE_URL.to_string()
}

fn default_rounds() -> u32 {
    defaults::DEFAULT_ROUNDS
}

fn default_requests_per_round() -> u32 {
    defaults::DEFAULT_REQUESTS_PER_ROUND
}

fn default_round_delay_ms() -> u64 {
    defaults::DEFAULT_ROUND_DELAY_MS
}

fn default_slow_threshold_ms() -> u64 {
    defaults::DEFAULT_SLOW_THRESHOLD_MS
}

fn default_timeout_secs() -> u64 {
    defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rounds, 3);
        assert_eq!(config.requests_per_round, 30);
        assert_eq!(config.round_delay_ms, 30_000);
        assert_eq!(config.slow_threshold_ms, 500);
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config {
            round_delay_ms: 1500,
            slow_threshold_ms: 250,
            timeout_seconds: 7,
            ..Config::default()
        };
        assert_eq!(config.round_delay(), Duration::from_millis(1500));
        assert_eq!(config.slow_threshold(), Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_empty_base_url_invalid() {
        let config = Config { base_url: "  ".to_string(), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_format() {
        let config = Config { base_url: "not-a-url".to_string(), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_scheme_invalid() {
        let config = Config { base_url: "ftp://example.com".to_string(), ..Config::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_zero_counts_invalid() {
        let config = Config { rounds: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { requests_per_round: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { slow_threshold_ms: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { timeout_seconds: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upper_bounds() {
        let config = Config { rounds: defaults::MAX_ROUNDS + 1, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config {
            requests_per_round: defaults::MAX_REQUESTS_PER_ROUND + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config { timeout_seconds: 301, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config {
            round_delay_ms: defaults::MAX_ROUND_DELAY_MS + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_delay_is_allowed() {
        let config = Config { round_delay_ms: 0, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parsed_base_url_keeps_path() {
        let config = Config {
            base_url: "https://proxy.example.com/tenant-a".to_string(),
            ..Config::default()
        };
        let url = config.parsed_base_url().unwrap();
        assert_eq!(url.host_str(), Some("proxy.example.com"));
        assert_eq!(url.path(), "/tenant-a");
    }
}
