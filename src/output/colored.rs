//! Colored formatter implementation with terminal color support
//!
//! Latencies are colored by their class against the slow threshold: green
//! when at most half of it, yellow up to the threshold, red above it.

use super::formatter::{format_ms, outcome_text, FormattingOptions, OutputFormatter, SERVER_METRIC_NOTE};
use crate::{
    executor::RunSettings,
    models::{RequestResult, RoundSummary, RunReport},
    types::LatencyClass,
};
use colored::*;
use std::time::Duration;

/// Terminal color for a latency class
pub fn latency_color(class: LatencyClass) -> Color {
    match class {
        LatencyClass::Fast => Color::Green,
        LatencyClass::Medium => Color::Yellow,
        LatencyClass::Slow => Color::Red,
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Colored and bold, or plain when colors are disabled
    fn strong(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    fn latency(&self, duration_ms: f64, class: LatencyClass) -> ColoredString {
        self.colorize(&format_ms(duration_ms), latency_color(class))
    }

    /// Slow count is red when any request crossed the threshold
    fn slow_count(&self, slow: u64, total: u64) -> ColoredString {
        let text = format!("{}/{}", slow, total);
        if slow == 0 {
            self.colorize(&text, self.color_scheme.success)
        } else {
            self.strong(&text, self.color_scheme.error)
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn options(&self) -> &FormattingOptions {
        &self.options
    }

    fn format_run_header(&self, settings: &RunSettings) -> String {
        format!(
            "{} {}\n{} {} rounds x {} concurrent requests, {}ms between rounds\n{} > {}ms, timeout {}s",
            self.strong("Target:", self.color_scheme.header),
            self.bold(settings.base_url.as_str()),
            self.strong("Load:", self.color_scheme.header),
            settings.rounds,
            settings.requests_per_round,
            settings.round_delay.as_millis(),
            self.strong("Slow:", self.color_scheme.header),
            settings.slow_threshold.as_millis(),
            settings.request_timeout.as_secs(),
        )
    }

    fn format_round_start(&self, round: u32, settings: &RunSettings) -> String {
        format!(
            "{} sending {} requests",
            self.bold(&format!("Round {}/{}:", round, settings.rounds)),
            settings.requests_per_round
        )
    }

    fn format_round_summary(&self, summary: &RoundSummary, total_rounds: u32) -> String {
        let mut line = format!(
            "{} {} slow (> {}ms), average {}",
            self.bold(&format!("Round {}/{}:", summary.round, total_rounds)),
            self.slow_count(summary.slow_count as u64, summary.total as u64),
            summary.slow_threshold_ms,
            self.latency(summary.average_ms, summary.average_class()),
        );
        if summary.failed > 0 {
            line.push_str(&format!(
                ", {}",
                self.colorize(&format!("{} failed", summary.failed), self.color_scheme.warning)
            ));
        }
        line.push_str(&format!(
            " {}",
            self.dimmed(&format!("(round took {})", format_ms(summary.wall_time_ms())))
        ));
        line
    }

    fn format_request_line(&self, result: &RequestResult, slow_threshold: Duration) -> String {
        let class = result.latency_class(slow_threshold);
        let outcome = outcome_text(result);
        let outcome = if result.is_failure() {
            self.colorize(&outcome, self.color_scheme.error)
        } else {
            self.colorize(&outcome, self.color_scheme.muted)
        };
        let marker = if class == LatencyClass::Slow {
            format!(" {}", self.strong("SLOW", self.color_scheme.error))
        } else {
            String::new()
        };

        format!(
            "  {} {:>10}  {}{}",
            self.dimmed(&format!("[r{} #{:>4}]", result.round, result.id)),
            self.latency(result.elapsed_ms(), class),
            outcome,
            marker
        )
    }

    fn format_waiting(&self, completed_round: u32, delay: Duration) -> String {
        let text = if delay.is_zero() {
            format!("Round {} done, starting next round", completed_round)
        } else {
            format!(
                "Waiting {} before round {}",
                format_ms(delay.as_secs_f64() * 1000.0),
                completed_round + 1
            )
        };
        self.dimmed(&text).to_string()
    }

    fn format_run_summary(&self, report: &RunReport) -> String {
        let average = report.overall_average_ms();
        let threshold_ms = report.rounds.first().map_or(0, |r| r.slow_threshold_ms);
        let failed = report.total_failed();
        let failed_text = format!("{} failed", failed);

        format!(
            "{} {} rounds, {} requests in {}: {} slow, {}, overall average {}\n{}",
            self.strong("Completed", self.color_scheme.success),
            report.rounds.len(),
            report.total_requests(),
            format_ms(report.total_duration.as_secs_f64() * 1000.0),
            self.slow_count(report.total_slow(), report.total_requests()),
            if failed == 0 {
                self.colorize(&failed_text, self.color_scheme.success)
            } else {
                self.colorize(&failed_text, self.color_scheme.warning)
            },
            self.latency(average, LatencyClass::classify_ms(average, threshold_ms)),
            self.dimmed(SERVER_METRIC_NOTE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestOutcome;
    use chrono::Utc;

    fn formatter() -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color: true,
            verbose_mode: true,
        })
    }

    fn summary(slow: u32, average_ms: f64) -> RoundSummary {
        RoundSummary {
            round: 1,
            total: 30,
            succeeded: 30,
            failed: 0,
            slow_count: slow,
            average_ms,
            slow_threshold_ms: 500,
            wall_time: Duration::from_millis(700),
        }
    }

    #[test]
    fn test_latency_colors() {
        assert_eq!(latency_color(LatencyClass::Fast), Color::Green);
        assert_eq!(latency_color(LatencyClass::Medium), Color::Yellow);
        assert_eq!(latency_color(LatencyClass::Slow), Color::Red);
    }

    #[test]
    fn test_round_summary_content() {
        let line = formatter().format_round_summary(&summary(30, 612.0), 3);
        assert!(line.contains("Round 1/3:"));
        assert!(line.contains("30/30"));
        assert!(line.contains("612.0ms"));
        assert!(!line.contains("failed"));
    }

    #[test]
    fn test_disabled_color_matches_plain_text_content() {
        let formatter = ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            verbose_mode: false,
        });
        let line = formatter.format_round_summary(&summary(0, 20.0), 3);
        assert_eq!(line, "Round 1/3: 0/30 slow (> 500ms), average 20.0ms (round took 700.0ms)");
    }

    #[test]
    fn test_request_line_marks_slow() {
        let slow = RequestResult::new(3, 1, Duration::from_millis(900), RequestOutcome::Status(200));
        let line = formatter().format_request_line(&slow, Duration::from_millis(500));
        assert!(line.contains("SLOW"));
        assert!(line.contains("HTTP 200"));

        let failed = RequestResult::new(
            4,
            1,
            Duration::from_millis(5),
            RequestOutcome::Failed("dns error".to_string()),
        );
        let line = formatter().format_request_line(&failed, Duration::from_millis(500));
        assert!(line.contains("error: dns error"));
        assert!(!line.contains("SLOW"));
    }

    #[test]
    fn test_run_summary() {
        let mut report = RunReport::new(Utc::now());
        report.rounds.push(summary(2, 300.0));
        report.rounds.push(summary(0, 100.0));

        let text = formatter().format_run_summary(&report);
        assert!(text.contains("2 rounds, 60 requests"));
        assert!(text.contains("2/60"));
        assert!(text.contains("0 failed"));
        assert!(text.contains("200.0ms"));
        assert!(text.contains(SERVER_METRIC_NOTE));
    }
}
