//! Command-line interface

use crate::config::EnvManager;
use clap::Parser;

/// Help footer listing the environment variables the config loader reads
fn env_help() -> String {
    format!(
        "{}\nExamples:\n  \
         latency-rounds --base-url https://proxy.example.com\n  \
         latency-rounds --rounds 5 --requests 50 --delay-ms 10000 --threshold-ms 300",
        EnvManager::display_env_help()
    )
}

/// Fire rounds of concurrent GET requests and report slow counts and mean latency
#[derive(Parser, Debug, Clone)]
#[command(name = "latency-rounds")]
#[command(version, about, long_about = None, after_help = env_help())]
pub struct Cli {
    /// Base URL of the target; requests go to <base>/api/v1/models
    #[arg(short = 'u', long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Number of rounds to run
    #[arg(short, long, value_parser = parse_rounds)]
    pub rounds: Option<u32>,

    /// Concurrent requests fired per round
    #[arg(short = 'n', long, value_parser = parse_requests)]
    pub requests: Option<u32>,

    /// Delay between rounds in milliseconds
    #[arg(short, long = "delay-ms", value_name = "MS", value_parser = parse_delay_ms)]
    pub delay_ms: Option<u64>,

    /// A request is slow when it takes strictly longer than this (milliseconds)
    #[arg(short = 's', long = "threshold-ms", value_name = "MS", value_parser = parse_threshold_ms)]
    pub threshold_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print one line per request
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output (JSON logs with source locations)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref base_url) = self.base_url {
            if base_url.trim().is_empty() {
                return Err("--base-url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// `Some` when a color flag was given, `None` to leave the decision to the environment
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

fn parse_bounded<T>(s: &str, min: T, max: T, what: &str) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    // Rust integer parsing accepts a leading '+', the flags do not
    if s.starts_with('+') {
        return Err(format!("Invalid {}: {}", what, s));
    }

    let value = s
        .parse::<T>()
        .map_err(|_| format!("Invalid {}: {}", what, s))?;

    if value < min || value > max {
        Err(format!("{} must be between {} and {}", what, min, max))
    } else {
        Ok(value)
    }
}

fn parse_rounds(s: &str) -> Result<u32, String> {
    parse_bounded(s, 1, crate::defaults::MAX_ROUNDS, "rounds")
}

fn parse_requests(s: &str) -> Result<u32, String> {
    parse_bounded(s, 1, crate::defaults::MAX_REQUESTS_PER_ROUND, "requests")
}

fn parse_delay_ms(s: &str) -> Result<u64, String> {
    parse_bounded(s, 0, crate::defaults::MAX_ROUND_DELAY_MS, "delay")
}

fn parse_threshold_ms(s: &str) -> Result<u64, String> {
    parse_bounded(s, 1, crate::defaults::MAX_SLOW_THRESHOLD_MS, "threshold")
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    parse_bounded(s, 1, crate::defaults::MAX_TIMEOUT_SECS, "timeout")
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
