//! Request dispatch, concurrent fan-out and aggregation of load-test results

pub mod aggregate;
pub mod dispatch;
pub mod extract;
pub mod fanout;
pub mod model;
pub mod payload;

use std::sync::Arc;
use std::time::Duration;

use loadgen_common::config::LoadTestConfig;
use loadgen_common::Result;
use loadgen_transport::HttpTransport;

pub use aggregate::aggregate;
pub use model::{AggregateResult, FailureSummary, RequestOutcome, RunSummary, TestBatch};

/// Validates `config`, fires one burst over a pooled HTTP client and aggregates it.
pub async fn run_load_test(config: &LoadTestConfig) -> Result<AggregateResult> {
    config.validate()?;
    let transport = HttpTransport::new(config.request_timeout_secs.map(Duration::from_secs))?;
    let (batch, total_time) = fanout::run(Arc::new(transport), config).await?;
    Ok(aggregate(batch, total_time, config.concurrency))
}
