use std::sync::Arc;

use loadgen_common::config::LoadTestConfig;
use loadgen_common::Result;
use loadgen_transport::ChatTransport;
use tokio::time::Instant;

use crate::dispatch::Dispatcher;
use crate::model::{RequestOutcome, TestBatch};
use crate::payload::ChatRequest;

/// Launches `config.concurrency` requests at once over the shared transport and waits
/// for every one of them.
///
/// Returns the outcomes ordered by request id together with the wall-clock time of the
/// whole burst in seconds. A failing request never cancels its siblings.
pub async fn run<T: ChatTransport>(transport: Arc<T>, config: &LoadTestConfig) -> Result<(TestBatch, f64)> {
    let request = ChatRequest::from_config(config);
    let dispatcher = Dispatcher::new(transport, &config.endpoint, &request)?;
    let concurrency = config.concurrency;
    tracing::info!(target: "loadgen", concurrency, endpoint = %config.endpoint, "starting burst");

    let start = Instant::now();
    let mut tasks = Vec::with_capacity(concurrency);
    for request_id in 0..concurrency {
        let d = dispatcher.clone();
        tasks.push(tokio::spawn(async move { d.dispatch(request_id).await }));
    }

    let mut batch = Vec::with_capacity(concurrency);
    for (request_id, task) in tasks.into_iter().enumerate() {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => RequestOutcome::Failure {
                request_id,
                latency: None,
                error: format!("dispatch task failed: {}", e),
            },
        };
        batch.push(outcome);
    }
    let total_time = start.elapsed().as_secs_f64();

    let ok = batch.iter().filter(|o| o.is_success()).count();
    tracing::info!(target: "loadgen", total_time, successful = ok, failed = batch.len() - ok, "burst finished");
    Ok((batch, total_time))
}
