use serde::Serialize;

/// Terminal result of one dispatched request.
///
/// The two failure paths differ: a non-200 reply carries no latency, a transport
/// or parse fault carries the time spent until the fault. Aggregation never reads
/// latency from failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success {
        request_id: usize,
        latency: f64,
        input_tokens: u64,
        output_tokens: u64,
        total_tokens: u64,
        /// Output tokens per second of latency.
        token_speed: f64,
    },
    Failure {
        request_id: usize,
        latency: Option<f64>,
        error: String,
    },
}

impl RequestOutcome {
    pub fn request_id(&self) -> usize {
        match self {
            RequestOutcome::Success { request_id, .. } | RequestOutcome::Failure { request_id, .. } => *request_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }

    pub fn latency(&self) -> Option<f64> {
        match self {
            RequestOutcome::Success { latency, .. } => Some(*latency),
            RequestOutcome::Failure { latency, .. } => *latency,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestOutcome::Success { .. } => None,
            RequestOutcome::Failure { error, .. } => Some(error),
        }
    }
}

/// Outcomes in launch order, one per request id.
pub type TestBatch = Vec<RequestOutcome>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub concurrency: usize,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_time: f64,
    pub avg_latency: f64,
    pub avg_token_speed: f64,
    pub overall_token_speed: f64,
    pub total_output_tokens: u64,
    pub p50_latency: f64,
    pub p95_latency: f64,
    pub p99_latency: Option<f64>,
    pub min_latency: f64,
    pub max_latency: f64,
}

/// Reduced shape used when no request succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureSummary {
    pub concurrency: usize,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_time: f64,
    pub error_sample: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateResult {
    Completed(RunSummary),
    AllFailed(FailureSummary),
}

impl AggregateResult {
    pub fn concurrency(&self) -> usize {
        match self {
            AggregateResult::Completed(s) => s.concurrency,
            AggregateResult::AllFailed(s) => s.concurrency,
        }
    }

    pub fn total_requests(&self) -> usize {
        match self {
            AggregateResult::Completed(s) => s.total_requests,
            AggregateResult::AllFailed(s) => s.total_requests,
        }
    }

    pub fn successful_requests(&self) -> usize {
        match self {
            AggregateResult::Completed(s) => s.successful_requests,
            AggregateResult::AllFailed(_) => 0,
        }
    }

    pub fn failed_requests(&self) -> usize {
        match self {
            AggregateResult::Completed(s) => s.failed_requests,
            AggregateResult::AllFailed(s) => s.failed_requests,
        }
    }

    pub fn total_time(&self) -> f64 {
        match self {
            AggregateResult::Completed(s) => s.total_time,
            AggregateResult::AllFailed(s) => s.total_time,
        }
    }
}
