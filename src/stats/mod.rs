//! Per-round aggregation of request results
//!
//! Deliberately small: a slow count against a threshold and an arithmetic
//! mean. Failed requests contribute their elapsed time like any other.

use crate::models::metrics::RequestResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counts and mean latency for one batch of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStatistics {
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub slow_count: u32,
    pub average_ms: f64,
}

impl RoundStatistics {
    /// Aggregate a batch; an empty batch has an average of 0
    pub fn from_results(results: &[RequestResult], slow_threshold: Duration) -> Self {
        let mut stats = Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            slow_count: 0,
            average_ms: 0.0,
        };
        let mut sum_ms = 0.0;

        for result in results {
            stats.total += 1;
            if result.is_failure() {
                stats.failed += 1;
            } else {
                stats.succeeded += 1;
            }
            if result.is_slow(slow_threshold) {
                stats.slow_count += 1;
            }
            sum_ms += result.elapsed_ms();
        }

        if stats.total > 0 {
            stats.average_ms = sum_ms / stats.total as f64;
        }

        stats
    }
}
