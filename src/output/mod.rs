//! Output formatting and display system
//!
//! Formatters turn run events into text; `ConsoleObserver` plugs a formatter
//! into the round runner and prints as the run progresses.

mod colored;
mod formatter;

pub use self::colored::{latency_color, ColorScheme, ColoredFormatter};
pub use self::formatter::{FormattingOptions, OutputFormatter, PlainFormatter, SERVER_METRIC_NOTE};

use crate::{
    executor::{RoundObserver, RunSettings},
    models::{RoundReport, RunReport},
};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Prints run progress as it happens
pub struct ConsoleObserver<W: Write + Send = io::Stdout> {
    formatter: Box<dyn OutputFormatter>,
    out: Mutex<W>,
    slow_threshold: Mutex<Duration>,
    total_rounds: Mutex<u32>,
}

impl ConsoleObserver<io::Stdout> {
    pub fn stdout(formatter: Box<dyn OutputFormatter>) -> Self {
        Self::with_writer(formatter, io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn with_writer(formatter: Box<dyn OutputFormatter>, out: W) -> Self {
        Self {
            formatter,
            out: Mutex::new(out),
            slow_threshold: Mutex::new(Duration::from_millis(crate::defaults::DEFAULT_SLOW_THRESHOLD_MS)),
            total_rounds: Mutex::new(0),
        }
    }

    /// Recover the writer, mainly to inspect captured output
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // A closed stdout must not take the run down with it
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

impl<W: Write + Send> RoundObserver for ConsoleObserver<W> {
    fn run_started(&self, settings: &RunSettings) {
        *self.slow_threshold.lock().unwrap_or_else(|e| e.into_inner()) = settings.slow_threshold;
        *self.total_rounds.lock().unwrap_or_else(|e| e.into_inner()) = settings.rounds;
        self.emit(&self.formatter.format_run_header(settings));
    }

    fn round_started(&self, round: u32, settings: &RunSettings) {
        self.emit("");
        self.emit(&self.formatter.format_round_start(round, settings));
    }

    fn round_completed(&self, report: &RoundReport) {
        if self.formatter.options().verbose_mode {
            let threshold = *self.slow_threshold.lock().unwrap_or_else(|e| e.into_inner());
            let mut results: Vec<_> = report.results.iter().collect();
            results.sort_by_key(|r| r.id);
            for result in results {
                self.emit(&self.formatter.format_request_line(result, threshold));
            }
        }

        let total_rounds = *self.total_rounds.lock().unwrap_or_else(|e| e.into_inner());
        self.emit(&self.formatter.format_round_summary(&report.summary, total_rounds));
    }

    fn waiting(&self, completed_round: u32, delay: Duration) {
        self.emit(&self.formatter.format_waiting(completed_round, delay));
    }

    fn run_completed(&self, report: &RunReport) {
        self.emit("");
        self.emit(&self.formatter.format_run_summary(report));
    }
}
