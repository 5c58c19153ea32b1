pub mod cases;
pub mod events;
pub mod state;

pub use events::*;
pub use state::*;

use crate::client::ApiClient;
use crate::utils::config::SuiteConfig;
use anyhow::Result;
use std::time::Duration;

/// Run the full smoke suite against the configured backend.
///
/// Executes every case in its fixed order, streams progress to the console
/// listener, and returns the final report. The caller decides the process
/// exit code from `summary.failed`.
pub async fn run_suite(config: SuiteConfig) -> Result<SuiteReport> {
    let (emitter, receiver) = events::EventEmitter::new();
    let listener = tokio::spawn(events::ConsoleEventListener::listen(receiver));

    let client = ApiClient::new(
        &config.base_url,
        Duration::from_millis(config.request_timeout_ms),
    )?;

    let mut runner = cases::SuiteRunner::new(client, config, emitter);
    let report = runner.run_all().await;

    // Let the listener drain the final events before closing the channel
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(runner);
    let _ = listener.await;

    Ok(report)
}
