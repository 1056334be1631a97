//! Environment variable handling and .env file management

use crate::{
    defaults,
    error::{AppError, Result},
    logging::LogLevel,
};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load a dotenv file if it exists
    ///
    /// Variables already present in the process environment win over the
    /// file's values.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path).map_err(|e| {
                AppError::config(format!("Failed to load {}: {}", path.display(), e))
            })?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "LOAD_BASE_URL" => {
                let parsed = url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid LOAD_BASE_URL '{}': {}", value, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!(
                        "LOAD_BASE_URL must use http or https: {}",
                        value
                    )));
                }
            }
            "LOAD_ROUNDS" => {
                check_range(key, value, 1, defaults::MAX_ROUNDS as u64)?;
            }
            "LOAD_REQUESTS" => {
                check_range(key, value, 1, defaults::MAX_REQUESTS_PER_ROUND as u64)?;
            }
            "LOAD_DELAY_MS" => {
                check_range(key, value, 0, defaults::MAX_ROUND_DELAY_MS)?;
            }
            "LOAD_SLOW_THRESHOLD_MS" => {
                check_range(key, value, 1, defaults::MAX_SLOW_THRESHOLD_MS)?;
            }
            "LOAD_TIMEOUT_SECONDS" => {
                check_range(key, value, 1, defaults::MAX_TIMEOUT_SECS)?;
            }
            "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_LEVEL" => {
                value.parse::<LogLevel>()?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("LOAD_BASE_URL", "Base URL of the target", "https://proxy.example.com"),
            ("LOAD_ROUNDS", "Number of rounds (1-1000)", "3"),
            ("LOAD_REQUESTS", "Concurrent requests per round (1-10000)", "30"),
            ("LOAD_DELAY_MS", "Delay between rounds in milliseconds", "30000"),
            ("LOAD_SLOW_THRESHOLD_MS", "Slow-request threshold in milliseconds", "500"),
            ("LOAD_TIMEOUT_SECONDS", "Per-request timeout in seconds (1-300)", "30"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_LEVEL", "Diagnostic log level", "info"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<24} {}\n", var, description));
            help.push_str(&format!("  {:<24} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value)
                    .err()
                    .map(|e| format!("{}: {}", name, e))
            })
            .collect()
    }
}

fn check_range(key: &str, value: &str, min: u64, max: u64) -> Result<()> {
    let parsed: u64 = value
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
    if parsed < min || parsed > max {
        return Err(AppError::config(format!(
            "{} must be between {} and {}, got: {}",
            key, min, max, parsed
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("LOAD_BASE_URL", "https://proxy.example.com").is_ok());
        assert!(EnvManager::validate_env_var("LOAD_ROUNDS", "3").is_ok());
        assert!(EnvManager::validate_env_var("LOAD_REQUESTS", " 30 ").is_ok());
        assert!(EnvManager::validate_env_var("LOAD_DELAY_MS", "0").is_ok());
        assert!(EnvManager::validate_env_var("LOAD_SLOW_THRESHOLD_MS", "500").is_ok());
        assert!(EnvManager::validate_env_var("LOAD_TIMEOUT_SECONDS", "30").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("LOG_LEVEL", "debug").is_ok());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());

        assert!(EnvManager::validate_env_var("LOAD_BASE_URL", "not-a-url").is_err());
        assert!(EnvManager::validate_env_var("LOAD_BASE_URL", "ftp://host").is_err());
        assert!(EnvManager::validate_env_var("LOAD_ROUNDS", "0").is_err());
        assert!(EnvManager::validate_env_var("LOAD_REQUESTS", "10001").is_err());
        assert!(EnvManager::validate_env_var("LOAD_SLOW_THRESHOLD_MS", "-5").is_err());
        assert!(EnvManager::validate_env_var("LOAD_TIMEOUT_SECONDS", "301").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
        assert!(EnvManager::validate_env_var("LOG_LEVEL", "loud").is_err());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("LOAD_SLOW_THRESHOLD_MS"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_validate_current_env_reports_bad_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            std::env::remove_var(name);
        }
        assert!(EnvManager::validate_current_env().is_empty());

        std::env::set_var("LOAD_ROUNDS", "zero");
        let warnings = EnvManager::validate_current_env();
        std::env::remove_var("LOAD_ROUNDS");

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("LOAD_ROUNDS"));
    }

    #[test]
    fn test_env_file_does_not_override_process_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("LOAD_REQUESTS", "12");
        std::env::remove_var("LOAD_ROUNDS");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "LOAD_REQUESTS=99").unwrap();
        writeln!(file, "LOAD_ROUNDS=7").unwrap();
        EnvManager::load_env_file_from(file.path(), false).unwrap();

        assert_eq!(std::env::var("LOAD_REQUESTS").unwrap(), "12");
        assert_eq!(std::env::var("LOAD_ROUNDS").unwrap(), "7");

        std::env::remove_var("LOAD_REQUESTS");
        std::env::remove_var("LOAD_ROUNDS");
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvManager::load_env_file_from(&dir.path().join(".env"), false).is_ok());
    }
}
