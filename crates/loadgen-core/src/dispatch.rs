use std::sync::Arc;

use loadgen_common::Result;
use loadgen_transport::ChatTransport;
use serde_json::Value;
use tokio::time::Instant;

use crate::extract::extract;
use crate::model::RequestOutcome;
use crate::payload::ChatRequest;

/// Issues single requests against one endpoint with a payload serialized once per run.
pub struct Dispatcher<T> {
    transport: Arc<T>,
    endpoint: Arc<str>,
    payload: Arc<Value>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            endpoint: self.endpoint.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<T: ChatTransport> Dispatcher<T> {
    pub fn new(transport: Arc<T>, endpoint: &str, request: &ChatRequest) -> Result<Self> {
        let payload = serde_json::to_value(request)?;
        Ok(Self { transport, endpoint: Arc::from(endpoint), payload: Arc::new(payload) })
    }

    /// Never fails: every fault becomes a `Failure` outcome. No retries.
    pub async fn dispatch(&self, request_id: usize) -> RequestOutcome {
        let start = Instant::now();
        let result = match self.transport.post_json(&self.endpoint, &self.payload).await {
            Ok(response) => extract(request_id, &response, start, Instant::now()),
            Err(err) => Err(err),
        };

        let outcome = result.unwrap_or_else(|err| RequestOutcome::Failure {
            request_id,
            latency: Some(start.elapsed().as_secs_f64()),
            error: err.to_string(),
        });

        match &outcome {
            RequestOutcome::Success { latency, output_tokens, .. } => {
                tracing::debug!(target: "loadgen", request_id, latency, output_tokens, "request succeeded");
            }
            RequestOutcome::Failure { error, .. } => {
                tracing::warn!(target: "loadgen", request_id, "request failed: {}", error);
            }
        }
        outcome
    }
}
