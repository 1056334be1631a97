//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{supports_color, Cli},
    config::env::EnvManager,
    error::Result,
    models::Config,
};
use std::path::PathBuf;

/// Configuration parser that combines CLI arguments with environment variables
///
/// Precedence, highest first: flags, process environment, `.env` file,
/// built-in defaults.
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read dotenv values from `path` instead of `./.env`
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(rounds) = self.cli.rounds {
            config.rounds = rounds;
        }
        if let Some(requests) = self.cli.requests {
            config.requests_per_round = requests;
        }
        if let Some(delay_ms) = self.cli.delay_ms {
            config.round_delay_ms = delay_ms;
        }
        if let Some(threshold_ms) = self.cli.threshold_ms {
            config.slow_threshold_ms = threshold_ms;
        }
        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        config.enable_color = match self.cli.color_override() {
            Some(forced) => forced,
            None => config.enable_color && supports_color(),
        };

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let summary = [
        format!("Base URL: {}", config.base_url),
        format!("Rounds: {}", config.rounds),
        format!("Requests per round: {}", config.requests_per_round),
        format!("Round delay: {}ms", config.round_delay_ms),
        format!("Slow threshold: {}ms", config.slow_threshold_ms),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use clap::Parser;
    use std::env;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const VARS: [&str; 8] = [
        "LOAD_BASE_URL",
        "LOAD_ROUNDS",
        "LOAD_REQUESTS",
        "LOAD_DELAY_MS",
        "LOAD_SLOW_THRESHOLD_MS",
        "LOAD_TIMEOUT_SECONDS",
        "ENABLE_COLOR",
        "LOG_LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn parse(args: &[&str]) -> Result<Config> {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from(args);
        ConfigParser::new(cli).with_env_file(dir.path().join(".env")).parse()
    }

    #[test]
    fn test_defaults_without_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = parse(&["test", "--no-color"]).unwrap();
        assert_eq!(config.base_url, crate::defaults::DEFAULT_BASE_URL);
        assert_eq!(config.rounds, 3);
        assert_eq!(config.requests_per_round, 30);
        assert_eq!(config.round_delay_ms, 30_000);
        assert_eq!(config.slow_threshold_ms, 500);
        assert_eq!(config.timeout_seconds, 30);
        assert!(!config.enable_color);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = parse(&[
            "test",
            "--base-url", "https://proxy.example.com",
            "--rounds", "5",
            "--requests", "10",
            "--delay-ms", "0",
            "--threshold-ms", "200",
            "--timeout", "5",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(config.base_url, "https://proxy.example.com");
        assert_eq!(config.rounds, 5);
        assert_eq!(config.requests_per_round, 10);
        assert_eq!(config.round_delay_ms, 0);
        assert_eq!(config.slow_threshold_ms, 200);
        assert_eq!(config.timeout_seconds, 5);
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("LOAD_ROUNDS", "8");
        env::set_var("LOAD_SLOW_THRESHOLD_MS", "750");

        // An explicit flag equal to the default still wins over the environment
        let result = parse(&["test", "--rounds", "3"]);
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.slow_threshold_ms, 750);
    }

    #[test]
    fn test_env_file_fills_gaps() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("LOAD_REQUESTS", "40");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "LOAD_REQUESTS=99").unwrap();
        writeln!(file, "LOAD_DELAY_MS=1234").unwrap();
        writeln!(file, "LOG_LEVEL=debug").unwrap();

        let cli = Cli::parse_from(["test"]);
        let result = ConfigParser::new(cli).with_env_file(file.path()).parse();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.requests_per_round, 40);
        assert_eq!(config.round_delay_ms, 1234);
        assert_eq!(config.log_level, Some(crate::logging::LogLevel::Debug));
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("LOAD_REQUESTS", "lots");

        let result = parse(&["test"]);
        clear_env();

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("LOAD_REQUESTS"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        assert!(parse(&["test", "--base-url", "localhost:8080"]).is_err());
        assert!(parse(&["test", "--base-url", "ws://localhost:8080"]).is_err());
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Base URL: http://localhost:8080"));
        assert!(summary.contains("Rounds: 3"));
        assert!(summary.contains("Slow threshold: 500ms"));
        assert!(summary.contains("Timeout: 30s"));
    }
}
