//! Latency Rounds - command-line entry point
//!
//! Fires rounds of concurrent GET requests at a service and prints the slow
//! count and average latency of each round.

use clap::Parser;
use latency_rounds::{app::App, cli::Cli, error::ErrorReporter};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Request tasks that panic are turned into failed results by the runner,
    // so the hook only reports
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();

    let app = match App::new(cli) {
        Ok(app) => app,
        Err(e) => {
            ErrorReporter::new(use_color).report_error(&e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = app.run().await {
        ErrorReporter::new(app.config().enable_color).report_error(&e);
        process::exit(e.exit_code());
    }
}
