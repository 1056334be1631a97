//! Request results and round/run summaries

use crate::stats::RoundStatistics;
use crate::types::{LatencyClass, RequestOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome and timing of one request within a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestResult {
    /// Identifier, unique within the round (1-based)
    pub id: u32,

    /// Round this request belongs to (1-based)
    pub round: u32,

    /// Wall-clock time from dispatch to settlement
    pub elapsed: Duration,

    /// Status code or failure description
    pub outcome: RequestOutcome,

    /// When the request was dispatched
    pub dispatched_at: DateTime<Utc>,
}

impl RequestResult {
    pub fn new(id: u32, round: u32, elapsed: Duration, outcome: RequestOutcome) -> Self {
        Self {
            id,
            round,
            elapsed,
            outcome,
            dispatched_at: Utc::now(),
        }
    }

    pub fn with_dispatched_at(mut self, dispatched_at: DateTime<Utc>) -> Self {
        self.dispatched_at = dispatched_at;
        self
    }

    pub fn status_code(&self) -> Option<u16> {
        self.outcome.status_code()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }

    /// Strictly slower than the threshold
    pub fn is_slow(&self, threshold: Duration) -> bool {
        self.elapsed > threshold
    }

    pub fn latency_class(&self, threshold: Duration) -> LatencyClass {
        LatencyClass::classify(self.elapsed, threshold)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Aggregate view of one completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// Results with elapsed time strictly above the threshold
    pub slow_count: u32,
    /// Mean elapsed time over all results, failures included
    pub average_ms: f64,
    pub slow_threshold_ms: u64,
    /// Time from the first dispatch to the last settlement
    pub wall_time: Duration,
}

impl RoundSummary {
    /// Summarise a round's results
    pub fn from_results(
        round: u32,
        results: &[RequestResult],
        slow_threshold: Duration,
        wall_time: Duration,
    ) -> Self {
        let stats = RoundStatistics::from_results(results, slow_threshold);
        Self {
            round,
            total: stats.total,
            succeeded: stats.succeeded,
            failed: stats.failed,
            slow_count: stats.slow_count,
            average_ms: stats.average_ms,
            slow_threshold_ms: slow_threshold.as_millis() as u64,
            wall_time,
        }
    }

    pub fn average_class(&self) -> LatencyClass {
        LatencyClass::classify_ms(self.average_ms, self.slow_threshold_ms)
    }

    pub fn wall_time_ms(&self) -> f64 {
        self.wall_time.as_secs_f64() * 1000.0
    }
}

/// A round's summary together with the individual results it was built from
///
/// The runner hands this to its observer and then keeps only the summary.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub summary: RoundSummary,
    pub results: Vec<RequestResult>,
}

impl RoundReport {
    pub fn failures(&self) -> impl Iterator<Item = &RequestResult> {
        self.results.iter().filter(|r| r.is_failure())
    }
}

/// Summary of a complete run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub rounds: Vec<RoundSummary>,
    pub started_at: DateTime<Utc>,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            rounds: Vec::new(),
            started_at,
            total_duration: Duration::ZERO,
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.rounds.iter().map(|r| r.total as u64).sum()
    }

    pub fn total_slow(&self) -> u64 {
        self.rounds.iter().map(|r| r.slow_count as u64).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.rounds.iter().map(|r| r.failed as u64).sum()
    }

    /// Mean over every request of the run, weighted by round size
    pub fn overall_average_ms(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .rounds
            .iter()
            .map(|r| r.average_ms * r.total as f64)
            .sum();
        weighted / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: u32, ms: u64, outcome: RequestOutcome) -> RequestResult {
        RequestResult::new(id, 1, Duration::from_millis(ms), outcome)
    }

    #[test]
    fn test_request_result_accessors() {
        let ok = result(1, 120, RequestOutcome::Status(200));
        assert_eq!(ok.status_code(), Some(200));
        assert!(ok.error().is_none());
        assert!((ok.elapsed_ms() - 120.0).abs() < f64::EPSILON);

        let failed = result(2, 5, RequestOutcome::Failed("refused".into()));
        assert!(failed.status_code().is_none());
        assert_eq!(failed.error(), Some("refused"));
        assert!(failed.is_failure());
    }

    #[test]
    fn test_slow_is_strictly_greater() {
        let threshold = Duration::from_millis(500);
        assert!(!result(1, 500, RequestOutcome::Status(200)).is_slow(threshold));
        assert!(result(2, 501, RequestOutcome::Status(200)).is_slow(threshold));
    }

    #[test]
    fn test_round_summary_from_results() {
        let results = vec![
            result(1, 100, RequestOutcome::Status(200)),
            result(2, 700, RequestOutcome::Status(500)),
            result(3, 900, RequestOutcome::Failed("timeout".into())),
            result(4, 300, RequestOutcome::Status(404)),
        ];
        let summary = RoundSummary::from_results(
            1,
            &results,
            Duration::from_millis(500),
            Duration::from_millis(910),
        );

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.slow_count, 2);
        assert!((summary.average_ms - 500.0).abs() < 1e-9);
        assert_eq!(summary.slow_threshold_ms, 500);
        assert_eq!(summary.average_class(), LatencyClass::Medium);
    }

    #[test]
    fn test_run_report_totals() {
        let mut report = RunReport::new(Utc::now());
        assert_eq!(report.overall_average_ms(), 0.0);

        let a = RoundSummary {
            round: 1,
            total: 10,
            succeeded: 8,
            failed: 2,
            slow_count: 1,
            average_ms: 100.0,
            slow_threshold_ms: 500,
            wall_time: Duration::from_millis(150),
        };
        let b = RoundSummary {
            round: 2,
            total: 30,
            succeeded: 30,
            failed: 0,
            slow_count: 3,
            average_ms: 200.0,
            ..a.clone()
        };
        report.rounds.push(a);
        report.rounds.push(b);

        assert_eq!(report.total_requests(), 40);
        assert_eq!(report.total_slow(), 4);
        assert_eq!(report.total_failed(), 2);
        assert!((report.overall_average_ms() - 175.0).abs() < 1e-9);
    }
}
