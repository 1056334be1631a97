//! Latency Rounds
//!
//! A round-based HTTP load generator. Each round fires a fixed-size batch of
//! concurrent GET requests at a deployed service, waits for every request to
//! settle, and reports how many were slow and the average latency. Rounds are
//! separated by a fixed delay so that server-side latency metrics get steady,
//! spaced-out samples.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{RoundObserver, RoundRunner, RunSettings};
pub use models::{Config, RequestResult, RoundReport, RoundSummary, RunReport};
pub use types::RequestOutcome;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
    pub const DEFAULT_ROUNDS: u32 = 3;
    pub const DEFAULT_REQUESTS_PER_ROUND: u32 = 30;
    pub const DEFAULT_ROUND_DELAY_MS: u64 = 30_000;
    pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 500;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Path appended to the base URL for every request
    pub const REQUEST_PATH: &str = "/api/v1/models";

    pub const MAX_ROUNDS: u32 = 1_000;
    pub const MAX_REQUESTS_PER_ROUND: u32 = 10_000;
    pub const MAX_ROUND_DELAY_MS: u64 = 86_400_000;
    pub const MAX_SLOW_THRESHOLD_MS: u64 = 600_000;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
}
