use loadgen_common::{LoadgenError, Result};
use loadgen_transport::TransportResponse;
use tokio::time::Instant;

use crate::model::RequestOutcome;
use crate::payload::ChatCompletionResponse;

/// Turns a completed response into an outcome.
///
/// A non-200 status is an `Ok` failure outcome without latency. A body that does not
/// match the expected shape is an `Err`; the caller converts it with its own timing.
pub fn extract(
    request_id: usize,
    response: &TransportResponse,
    start: Instant,
    end: Instant,
) -> Result<RequestOutcome> {
    if response.status != 200 {
        return Ok(RequestOutcome::Failure {
            request_id,
            latency: None,
            error: format!("HTTP {}: {}", response.status, response.body),
        });
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
        .map_err(|e| LoadgenError::MalformedResponse(e.to_string()))?;
    let usage = parsed.usage;
    let latency = end.saturating_duration_since(start).as_secs_f64();
    let token_speed = if latency > 0.0 { usage.completion_tokens as f64 / latency } else { 0.0 };

    Ok(RequestOutcome::Success {
        request_id,
        latency,
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
        token_speed,
    })
}
