//! Error handling for the load round runner
//!
//! Only start-up problems (bad configuration, an HTTP client that cannot be
//! built) travel as `AppError` values up to `main`. Per-request failures are
//! converted into `RequestOutcome::Failed` inside the runner and never
//! propagate.

use thiserror::Error;

/// Custom error types for the load round runner
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors (URLs, numbers, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP request error
    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Network(_) => "NETWORK",
            Self::HttpRequest(_) => "HTTP",
            Self::Timeout(_) => "TIMEOUT",
            Self::Validation(_) => "VALIDATION",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Network(_) | Self::HttpRequest(_) => 2,
            Self::Timeout(_) => 3,
            Self::Internal(_) => 99,
        }
    }

    /// Short hint printed after the error on the console
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => Some(
                "Check --base-url, --rounds, --requests, --delay-ms, --threshold-ms and --timeout, \
                 or the matching LOAD_* variables in your environment or .env file.",
            ),
            Self::Network(_) | Self::HttpRequest(_) => {
                Some("The HTTP client could not be created; check the local TLS setup.")
            }
            Self::Timeout(_) | Self::Internal(_) => None,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::HttpRequest(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let message = with_root_cause(&error);
        if error.is_timeout() {
            Self::timeout(message)
        } else if error.is_connect() || error.is_request() {
            Self::network(message)
        } else {
            Self::http_request(message)
        }
    }
}

/// Top-level message followed by the innermost cause, e.g. the io error
/// behind "error sending request"
fn with_root_cause(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut root = None;
    let mut source = error.source();
    while let Some(cause) = source {
        root = Some(cause);
        source = cause.source();
    }

    if let Some(root) = root {
        let cause = root.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Render an error and its hint, one line each
    pub fn render(&self, error: &AppError) -> String {
        let mut rendered = error.format_for_console(self.use_color);
        if let Some(hint) = error.suggestion() {
            rendered.push_str("\n\n");
            rendered.push_str(hint);
        }
        rendered
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}
