//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::time::Duration;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// How a single request settled
///
/// Any HTTP status code counts as a response, 4xx and 5xx included. Only
/// transport-level problems (refused connection, DNS failure, timeout) are
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestOutcome {
    /// The server answered with this status code
    Status(u16),
    /// The request never produced a response
    Failed(String),
}

impl RequestOutcome {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Status(_) => None,
            Self::Failed(description) => Some(description),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Failed(description) => write!(f, "failed: {}", description),
        }
    }
}

/// Latency classification relative to the slow threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
    /// At most half the threshold
    Fast,
    /// Above half the threshold, up to and including it
    Medium,
    /// Strictly above the threshold
    Slow,
}

impl LatencyClass {
    /// Classify a duration against the slow threshold
    pub fn classify(elapsed: Duration, threshold: Duration) -> Self {
        if elapsed > threshold {
            Self::Slow
        } else if elapsed * 2 > threshold {
            Self::Medium
        } else {
            Self::Fast
        }
    }

    /// Classify a millisecond average against the slow threshold
    pub fn classify_ms(elapsed_ms: f64, threshold_ms: u64) -> Self {
        let threshold_ms = threshold_ms as f64;
        if elapsed_ms > threshold_ms {
            Self::Slow
        } else if elapsed_ms * 2.0 > threshold_ms {
            Self::Medium
        } else {
            Self::Fast
        }
    }
}
