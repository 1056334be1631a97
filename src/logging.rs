//! Structured logging for the load round runner
//!
//! Progress text for humans goes through `output`; this logger carries the
//! diagnostic side: per-request settlement at debug level, round boundaries
//! at info level with a correlation id per round, and failure summaries as
//! warnings. Console or JSON lines, chosen from the configuration.

use crate::error::{AppError, Result};
use crate::models::{Config, RequestResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Only used as a minimum level; mutes the logger
    Off = 5,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Off => "OFF",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Off => "",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "OFF" => Ok(LogLevel::Off),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
}

/// Logger implementation with console and JSON output
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger at info level
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger whose level and format follow the configuration
    pub fn with_config(name: &str, config: &Config) -> Self {
        let min_level = config.log_level.unwrap_or(if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        });

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// A logger that writes nothing
    pub fn silent(name: &str) -> Self {
        let mut logger = Self::new(name);
        logger.min_level = LogLevel::Off;
        logger.use_color = false;
        logger
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Start a correlated operation and return its id
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .log()
            .await;

        correlation_id
    }

    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str) {
        self.info(&format!("Completed {}", operation_name))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Attach context and render an entry, or `None` if it is filtered out
    async fn render(&self, mut entry: LogEntry) -> Option<(LogLevel, String)> {
        if !self.would_log(entry.level) {
            return None;
        }

        {
            let context = self.context.read().await;
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.current_correlation_id.clone();
            }
        }

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        };
        Some((entry.level, output))
    }

    async fn write_entry(&self, entry: LogEntry) {
        // stdout belongs to the round progress output
        if let Some((_, output)) = self.render(entry).await {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        let fields: Vec<String> = entry
            .fields
            .iter()
            .filter(|(k, _)| k.as_str() != "session_id")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        if !fields.is_empty() {
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}", entry.message),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: BTreeMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Attach the identity, timing and outcome of a settled request
    pub fn request(self, result: &RequestResult) -> Self {
        self.field("round", result.round)
            .field("id", result.id)
            .field("elapsed_ms", result.elapsed_ms())
            .field("status", result.status_code())
            .field("error", result.error())
    }

    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}
