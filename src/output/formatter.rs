//! Core formatting trait and the plain text implementation

use crate::{
    executor::RunSettings,
    models::{RequestResult, RoundSummary, RunReport},
};
use std::time::Duration;

/// Printed after every run; the tool only ever sees client-side timings
pub const SERVER_METRIC_NOTE: &str = "Client-side timings only: whether the target's own latency metric \
was populated has to be checked in the target's monitoring.";

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    fn options(&self) -> &FormattingOptions;

    /// Banner describing what is about to be sent
    fn format_run_header(&self, settings: &RunSettings) -> String;

    fn format_round_start(&self, round: u32, settings: &RunSettings) -> String;

    fn format_round_summary(&self, summary: &RoundSummary, total_rounds: u32) -> String;

    /// One line per settled request, shown in verbose mode
    fn format_request_line(&self, result: &RequestResult, slow_threshold: Duration) -> String;

    fn format_waiting(&self, completed_round: u32, delay: Duration) -> String;

    fn format_run_summary(&self, report: &RunReport) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Print individual request lines
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

/// Format a duration in milliseconds the way the round lines show it
pub(crate) fn format_ms(duration_ms: f64) -> String {
    if duration_ms < 1000.0 {
        format!("{:.1}ms", duration_ms)
    } else if duration_ms < 60_000.0 {
        format!("{:.2}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60_000.0) as u64;
        let seconds = (duration_ms % 60_000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

pub(crate) fn outcome_text(result: &RequestResult) -> String {
    match result.status_code() {
        Some(code) => format!("HTTP {}", code),
        None => format!("error: {}", result.error().unwrap_or("unknown")),
    }
}

impl OutputFormatter for PlainFormatter {
    fn options(&self) -> &FormattingOptions {
        &self.options
    }

    fn format_run_header(&self, settings: &RunSettings) -> String {
        format!(
            "Target: {}\nRounds: {}, {} concurrent requests each, {}ms between rounds\nSlow threshold: > {}ms, timeout: {}s",
            settings.base_url,
            settings.rounds,
            settings.requests_per_round,
            settings.round_delay.as_millis(),
            settings.slow_threshold.as_millis(),
            settings.request_timeout.as_secs(),
        )
    }

    fn format_round_start(&self, round: u32, settings: &RunSettings) -> String {
        format!(
            "Round {}/{}: sending {} requests",
            round, settings.rounds, settings.requests_per_round
        )
    }

    fn format_round_summary(&self, summary: &RoundSummary, total_rounds: u32) -> String {
        let mut line = format!(
            "Round {}/{}: {}/{} slow (> {}ms), average {}",
            summary.round,
            total_rounds,
            summary.slow_count,
            summary.total,
            summary.slow_threshold_ms,
            format_ms(summary.average_ms),
        );
        if summary.failed > 0 {
            line.push_str(&format!(", {} failed", summary.failed));
        }
        line.push_str(&format!(" (round took {})", format_ms(summary.wall_time_ms())));
        line
    }

    fn format_request_line(&self, result: &RequestResult, slow_threshold: Duration) -> String {
        let marker = if result.is_slow(slow_threshold) { " SLOW" } else { "" };
        format!(
            "  [r{} #{:>4}] {:>10}  {}{}",
            result.round,
            result.id,
            format_ms(result.elapsed_ms()),
            outcome_text(result),
            marker
        )
    }

    fn format_waiting(&self, completed_round: u32, delay: Duration) -> String {
        if delay.is_zero() {
            format!("Round {} done, starting next round", completed_round)
        } else {
            format!(
                "Waiting {} before round {}",
                format_ms(delay.as_secs_f64() * 1000.0),
                completed_round + 1
            )
        }
    }

    fn format_run_summary(&self, report: &RunReport) -> String {
        format!(
            "Completed {} rounds, {} requests in {}: {} slow, {} failed, overall average {}\n{}",
            report.rounds.len(),
            report.total_requests(),
            format_ms(report.total_duration.as_secs_f64() * 1000.0),
            report.total_slow(),
            report.total_failed(),
            format_ms(report.overall_average_ms()),
            SERVER_METRIC_NOTE,
        )
    }
}
