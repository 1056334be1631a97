//! Round execution engine
//!
//! A run is a bounded loop of rounds. Each round spawns one task per request,
//! joins every task (a full barrier, never first-wins), aggregates the
//! results and reports them, then sleeps for the inter-round delay. Rounds
//! never overlap.
//!
//! A request can fail (refused connection, DNS error, timeout, even a
//! panicking task) but that only ever produces a `RequestOutcome::Failed`
//! record. Nothing a request does can abort its round or the run.

use crate::{
    client::{build_request_url, HttpClient},
    error::{AppError, Result},
    log_debug, log_info, log_warn,
    logging::Logger,
    models::{Config, RequestResult, RoundReport, RoundSummary, RunReport},
    types::RequestOutcome,
};
use chrono::{DateTime, Utc};
use futures::{future::join_all, FutureExt};
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};
use tokio::time::{sleep, timeout, Instant};
use url::Url;

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub base_url: Url,
    pub rounds: u32,
    pub requests_per_round: u32,
    pub round_delay: Duration,
    pub slow_threshold: Duration,
    pub request_timeout: Duration,
}

impl TryFrom<&Config> for RunSettings {
    type Error = AppError;

    fn try_from(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.parsed_base_url()?,
            rounds: config.rounds,
            requests_per_round: config.requests_per_round,
            round_delay: config.round_delay(),
            slow_threshold: config.slow_threshold(),
            request_timeout: config.timeout(),
        })
    }
}

/// Receives progress events while a run is in flight
///
/// Every method has an empty default so observers only implement what they
/// display.
pub trait RoundObserver: Send + Sync {
    fn run_started(&self, _settings: &RunSettings) {}

    fn round_started(&self, _round: u32, _settings: &RunSettings) {}

    fn round_completed(&self, _report: &RoundReport) {}

    /// Called after round `completed_round` when another round follows
    fn waiting(&self, _completed_round: u32, _delay: Duration) {}

    fn run_completed(&self, _report: &RunReport) {}
}

/// Observer that ignores every event
pub struct NoopObserver;

impl RoundObserver for NoopObserver {}

/// Drives the configured number of rounds against one HTTP client
pub struct RoundRunner {
    client: Arc<dyn HttpClient>,
    settings: RunSettings,
    logger: Logger,
}

impl RoundRunner {
    pub fn new(client: Arc<dyn HttpClient>, settings: RunSettings, logger: Logger) -> Self {
        Self {
            client,
            settings,
            logger,
        }
    }

    /// Run every round in order and return the per-round summaries
    pub async fn run(&self, observer: &dyn RoundObserver) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new(Utc::now());

        observer.run_started(&self.settings);

        for round in 1..=self.settings.rounds {
            observer.round_started(round, &self.settings);

            let round_report = self.run_round(round).await;
            observer.round_completed(&round_report);
            report.rounds.push(round_report.summary);

            if round < self.settings.rounds {
                observer.waiting(round, self.settings.round_delay);
                if !self.settings.round_delay.is_zero() {
                    log_debug!(self.logger, "Sleeping {}ms before round {}", self.settings.round_delay.as_millis(), round + 1);
                    sleep(self.settings.round_delay).await;
                }
            }
        }

        report.total_duration = started.elapsed();
        observer.run_completed(&report);
        report
    }

    /// Fire one batch of requests, wait for all of them and summarise
    pub async fn run_round(&self, round: u32) -> RoundReport {
        let operation = format!("round {}", round);
        let correlation_id = self.logger.start_operation(&operation).await;

        let count = self.settings.requests_per_round as usize;
        let mut dispatched = Vec::with_capacity(count);
        let mut handles = Vec::with_capacity(count);
        let round_start = Instant::now();

        for id in 1..=self.settings.requests_per_round {
            let url = build_request_url(&self.settings.base_url, round, id);
            let client = Arc::clone(&self.client);
            let request_timeout = self.settings.request_timeout;
            let dispatched_at = Instant::now();
            let dispatched_wall = Utc::now();

            dispatched.push((id, dispatched_at, dispatched_wall));
            handles.push(tokio::spawn(dispatch(
                client,
                url,
                round,
                id,
                request_timeout,
                dispatched_at,
                dispatched_wall,
            )));
        }

        let joined = join_all(handles).await;
        let wall_time = round_start.elapsed();

        let mut results = Vec::with_capacity(count);
        for ((id, dispatched_at, dispatched_wall), outcome) in dispatched.into_iter().zip(joined) {
            let result = match outcome {
                Ok(result) => result,
                // Panics are caught inside the task; this is a cancelled task
                Err(join_error) => {
                    self.logger
                        .error("Request task did not complete")
                        .field("round", round)
                        .field("id", id)
                        .field("panicked", join_error.is_panic())
                        .log()
                        .await;
                    RequestResult::new(
                        id,
                        round,
                        dispatched_at.elapsed(),
                        RequestOutcome::Failed(
                            AppError::internal(format!("request task aborted: {}", join_error)).to_string(),
                        ),
                    )
                    .with_dispatched_at(dispatched_wall)
                }
            };

            self.logger.debug("Request settled").request(&result).log().await;
            results.push(result);
        }

        let summary = RoundSummary::from_results(round, &results, self.settings.slow_threshold, wall_time);

        if summary.failed > 0 {
            log_warn!(
                self.logger,
                "Round {}: {} of {} requests failed without a response",
                round,
                summary.failed,
                summary.total
            );
        }
        log_info!(
            self.logger,
            "Round {}: {} slow (> {}ms), average {:.1}ms",
            round,
            summary.slow_count,
            summary.slow_threshold_ms,
            summary.average_ms
        );
        self.logger.end_operation(&correlation_id, &operation).await;

        RoundReport { summary, results }
    }
}

/// Issue one request and time it from dispatch to settlement
async fn dispatch(
    client: Arc<dyn HttpClient>,
    url: Url,
    round: u32,
    id: u32,
    request_timeout: Duration,
    dispatched_at: Instant,
    dispatched_wall: DateTime<Utc>,
) -> RequestResult {
    // A panic inside the client settles this request only, timed where it happened
    let request = AssertUnwindSafe(client.get(&url)).catch_unwind();
    let outcome = match timeout(request_timeout, request).await {
        Ok(Ok(Ok(status))) => RequestOutcome::Status(status),
        Ok(Ok(Err(error))) => RequestOutcome::Failed(error.to_string()),
        Ok(Err(panic)) => RequestOutcome::Failed(
            AppError::internal(format!("request panicked: {}", panic_message(panic.as_ref()))).to_string(),
        ),
        Err(_) => RequestOutcome::Failed(
            AppError::timeout(format!("no response within {}ms", request_timeout.as_millis())).to_string(),
        ),
    };

    RequestResult::new(id, round, dispatched_at.elapsed(), outcome).with_dispatched_at(dispatched_wall)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
