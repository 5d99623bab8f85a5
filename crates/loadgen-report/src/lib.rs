//! Console and file output for aggregate results

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use loadgen_common::Result;
use loadgen_core::AggregateResult;

pub const REPORT_PREFIX: &str = "loadgen_concurrency_test";

pub fn render_summary(result: &AggregateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==== Test Results ====");
    let _ = writeln!(out, "Concurrency level: {}", result.concurrency());
    let _ = writeln!(out, "Successful requests: {}/{}", result.successful_requests(), result.total_requests());

    match result {
        AggregateResult::Completed(s) => {
            let _ = writeln!(out, "\nPerformance Metrics:");
            let _ = writeln!(out, "  Total time: {:.2} seconds", s.total_time);
            let _ = writeln!(out, "  Average latency: {:.2} seconds", s.avg_latency);
            let _ = writeln!(out, "  Average token speed: {:.2} tokens/second", s.avg_token_speed);
            let _ = writeln!(out, "  Overall token generation speed: {:.2} tokens/second", s.overall_token_speed);
            let _ = writeln!(out, "  P50 latency: {:.2} seconds", s.p50_latency);
            let _ = writeln!(out, "  P95 latency: {:.2} seconds", s.p95_latency);
            if let Some(p99) = s.p99_latency {
                let _ = writeln!(out, "  P99 latency: {:.2} seconds", p99);
            }
            let _ = writeln!(out, "  Total output tokens: {}", s.total_output_tokens);
        }
        AggregateResult::AllFailed(f) => {
            let _ = writeln!(out, "\nAll requests failed. Sample error: {}", f.error_sample);
        }
    }
    out
}

pub fn report_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.json", REPORT_PREFIX, timestamp.format("%Y%m%d-%H%M%S"))
}

/// Writes the result as indented JSON into `dir`, named after the current local time.
pub fn write_json(result: &AggregateResult, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(report_file_name(&Local::now()));
    let text = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, text)?;
    tracing::info!(target: "loadgen", path = %path.display(), "results saved");
    Ok(path)
}
