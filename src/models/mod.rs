//! Data models and structures for the load round runner

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{RequestResult, RoundReport, RoundSummary, RunReport};
