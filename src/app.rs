//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::{HttpClient, ReqwestClient},
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, Result},
    executor::{RoundObserver, RoundRunner, RunSettings},
    logging::Logger,
    models::{Config, RunReport},
    output::{ConsoleObserver, OutputFormatterFactory},
};
use std::sync::Arc;
use uuid::Uuid;

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    logger: Logger,
}

impl App {
    /// Build the application from command-line arguments
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        let config = load_config(cli)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        let logger = Logger::with_config("RUNNER", &config);
        Self { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every round against the configured target, printing progress to stdout
    pub async fn run(&self) -> Result<RunReport> {
        let client = ReqwestClient::new(self.config.timeout())?;
        let formatter = OutputFormatterFactory::create_formatter(self.config.enable_color, self.config.verbose);
        let observer = ConsoleObserver::stdout(formatter);

        self.run_with(Arc::new(client), &observer).await
    }

    /// Run with an explicit client and observer
    pub async fn run_with(&self, client: Arc<dyn HttpClient>, observer: &dyn RoundObserver) -> Result<RunReport> {
        let warnings = validate_config(&self.config)?;

        if self.config.debug {
            println!("{} v{} (built {})", crate::PKG_NAME, crate::VERSION, crate::BUILD_TIME);
            if let Some(commit) = crate::GIT_COMMIT {
                println!("Commit: {}", commit);
            }
            println!("\nConfiguration Summary:");
            println!("{}\n", display_config_summary(&self.config));
        }

        if !warnings.is_empty() {
            println!("Configuration Warnings:");
            for warning in &warnings {
                println!("  {}", warning.format(self.config.enable_color));
            }
            println!();
        }

        let settings = RunSettings::try_from(&self.config)?;
        self.logger.set_session_id(Uuid::new_v4().to_string()).await;
        self.logger
            .info("Starting run")
            .field("base_url", settings.base_url.as_str())
            .field("rounds", settings.rounds)
            .field("requests_per_round", settings.requests_per_round)
            .log()
            .await;

        let runner = RoundRunner::new(client, settings, self.logger.clone());
        let report = runner.run(observer).await;

        self.logger
            .info("Run finished")
            .field("total_requests", report.total_requests())
            .field("total_slow", report.total_slow())
            .field("total_failed", report.total_failed())
            .log()
            .await;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::NoopObserver;
    use clap::Parser;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            rounds: 2,
            requests_per_round: 5,
            round_delay_ms: 0,
            timeout_seconds: 5,
            enable_color: false,
            log_level: Some(crate::logging::LogLevel::Off),
            ..Config::default()
        }
    }

    #[test]
    fn test_conflicting_color_flags_rejected() {
        let cli = Cli::parse_from(["test", "--color", "--no-color"]);
        let err = App::new(cli).err().unwrap();
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_run_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(10)
            .mount(&server)
            .await;

        let app = App::from_config(config_for(&server.uri()));
        let client = Arc::new(ReqwestClient::new(app.config().timeout()).unwrap());
        let report = app.run_with(client, &NoopObserver).await.unwrap();

        assert_eq!(report.rounds.len(), 2);
        assert_eq!(report.total_requests(), 10);
        assert_eq!(report.total_failed(), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_request() {
        let mut config = config_for("http://localhost:8080");
        config.requests_per_round = 0;

        let app = App::from_config(config);
        let client = Arc::new(ReqwestClient::new(std::time::Duration::from_secs(1)).unwrap());
        let err = app.run_with(client, &NoopObserver).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
