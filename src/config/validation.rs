//! Configuration validation utilities and rules
//!
//! `Config::validate` rejects values that cannot run at all. The checks here
//! run afterwards and only produce warnings about settings that will run but
//! probably not measure what the user expects.

use super::env::EnvManager;
use crate::{error::Result, models::Config};
use colored::Colorize;

/// Requests per round above which the client machine itself may skew timings
const LARGE_BATCH: u32 = 500;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Self::validate_base_url(config)?;
        warnings.extend(Self::validate_load_settings(config));
        warnings.extend(Self::validate_environment());

        Ok(warnings)
    }

    /// Out-of-range values only reach here when a flag overrode them
    fn validate_environment() -> Vec<ValidationWarning> {
        EnvManager::validate_current_env()
            .into_iter()
            .map(|problem| ValidationWarning::new(ValidationLevel::Warning, format!("Ignored environment value, {}", problem)))
            .collect()
    }

    fn validate_base_url(config: &Config) -> Result<Vec<ValidationWarning>> {
        let parsed = config.parsed_base_url()?;
        let mut warnings = Vec::new();

        if parsed.scheme() == "http" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Base URL '{}' uses plain HTTP", parsed),
            ));
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Base URL '{}' has a query or fragment, which is replaced by round/id parameters",
                    parsed
                ),
            ));
        }

        Ok(warnings)
    }

    fn validate_load_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.slow_threshold() >= config.timeout() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Slow threshold of {}ms is not below the {}s timeout, so no completed request can be slow",
                    config.slow_threshold_ms, config.timeout_seconds
                ),
            ));
        }

        if config.round_delay_ms == 0 && config.rounds > 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Round delay is 0, rounds will run back to back".to_string(),
            ));
        }

        if config.requests_per_round > LARGE_BATCH {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} concurrent requests per round may exhaust local sockets and inflate latency",
                    config.requests_per_round
                ),
            ));
        }

        let total = config.rounds as u64 * config.requests_per_round as u64;
        if total > 10_000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Configuration will send {} requests in total", total),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            let tag = match self.level {
                ValidationLevel::Info => tag.blue(),
                ValidationLevel::Warning => tag.yellow().bold(),
            };
            format!("{} {}", tag, self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(warnings: &[ValidationWarning], needle: &str) -> bool {
        warnings.iter().any(|w| w.message.contains(needle))
    }

    #[test]
    fn test_default_config_warnings() {
        let warnings = validate_config(&Config::default()).unwrap();
        // Default target is plain HTTP on localhost
        assert!(has(&warnings, "plain HTTP"));
        assert!(!has(&warnings, "back to back"));
        assert!(!has(&warnings, "concurrent requests"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = Config::default();
        config.rounds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_threshold_not_below_timeout() {
        let mut config = Config::default();
        config.base_url = "https://proxy.example.com".to_string();
        config.timeout_seconds = 1;
        config.slow_threshold_ms = 1_000;

        let warnings = validate_config(&config).unwrap();
        assert!(has(&warnings, "no completed request can be slow"));
        assert!(warnings.iter().all(|w| !w.message.contains("plain HTTP")));
    }

    #[test]
    fn test_zero_delay_and_large_batch() {
        let mut config = Config::default();
        config.round_delay_ms = 0;
        config.requests_per_round = 600;
        config.rounds = 20;

        let warnings = validate_config(&config).unwrap();
        assert!(has(&warnings, "back to back"));
        assert!(has(&warnings, "600 concurrent requests"));
        assert!(has(&warnings, "12000 requests in total"));
    }

    #[test]
    fn test_single_round_zero_delay_is_fine() {
        let mut config = Config::default();
        config.rounds = 1;
        config.round_delay_ms = 0;
        assert!(!has(&validate_config(&config).unwrap(), "back to back"));
    }

    #[test]
    fn test_query_in_base_url() {
        let mut config = Config::default();
        config.base_url = "http://localhost:8080/?x=1".to_string();
        assert!(has(&validate_config(&config).unwrap(), "replaced by round/id"));
    }

    #[test]
    fn test_overridden_env_value_is_reported() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("LOAD_ROUNDS", "5000");
        let warnings = validate_config(&Config::default()).unwrap();
        std::env::remove_var("LOAD_ROUNDS");

        assert!(has(&warnings, "Ignored environment value, LOAD_ROUNDS"));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
        assert!(warning.format(true).contains("careful"));
    }
}
