use crate::model::{AggregateResult, FailureSummary, RequestOutcome, RunSummary, TestBatch};

/// Error sample reported when the batch holds no outcomes at all.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// p99 needs at least this many successful samples.
pub const P99_MIN_SAMPLES: usize = 100;

struct Sample {
    latency: f64,
    output_tokens: u64,
    token_speed: f64,
}

/// Summarises a finished batch. Statistics are computed over successes only.
pub fn aggregate(batch: TestBatch, total_time: f64, concurrency: usize) -> AggregateResult {
    let total_requests = batch.len();
    let mut successes = Vec::with_capacity(batch.len());
    let mut first_error: Option<String> = None;
    let mut failed_requests = 0;

    for outcome in batch {
        match outcome {
            RequestOutcome::Success { latency, output_tokens, token_speed, .. } => {
                successes.push(Sample { latency, output_tokens, token_speed });
            }
            RequestOutcome::Failure { error, .. } => {
                failed_requests += 1;
                first_error.get_or_insert(error);
            }
        }
    }

    if successes.is_empty() {
        return AggregateResult::AllFailed(FailureSummary {
            concurrency,
            total_requests,
            successful_requests: 0,
            failed_requests,
            total_time,
            error_sample: first_error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        });
    }

    let n = successes.len();
    let mut latencies: Vec<f64> = successes.iter().map(|s| s.latency).collect();
    latencies.sort_by(|a, b| a.total_cmp(b));
    let total_output_tokens: u64 = successes.iter().map(|s| s.output_tokens).sum();
    let overall_token_speed = if total_time > 0.0 { total_output_tokens as f64 / total_time } else { 0.0 };

    AggregateResult::Completed(RunSummary {
        concurrency,
        total_requests,
        successful_requests: n,
        failed_requests,
        total_time,
        avg_latency: mean(latencies.iter().copied()),
        avg_token_speed: mean(successes.iter().map(|s| s.token_speed)),
        overall_token_speed,
        total_output_tokens,
        p50_latency: percentile(&latencies, 50).unwrap_or_default(),
        p95_latency: percentile(&latencies, 95).unwrap_or_default(),
        p99_latency: if n >= P99_MIN_SAMPLES { percentile(&latencies, 99) } else { None },
        min_latency: latencies[0],
        max_latency: latencies[n - 1],
    })
}

/// Nearest-rank index `floor(len * pct / 100)`, clamped into the sample.
pub fn percentile_index(len: usize, pct: usize) -> usize {
    (len * pct / 100).min(len.saturating_sub(1))
}

/// Nearest-rank percentile of an ascending slice; `None` when empty.
pub fn percentile(sorted: &[f64], pct: usize) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[percentile_index(sorted.len(), pct)])
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
