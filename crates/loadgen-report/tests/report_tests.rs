use chrono::{TimeZone, Utc};
use loadgen_core::{aggregate, AggregateResult, RequestOutcome};
use loadgen_report::{render_summary, report_file_name, write_json};

fn success(request_id: usize, latency: f64) -> RequestOutcome {
    RequestOutcome::Success {
        request_id,
        latency,
        input_tokens: 10,
        output_tokens: 20,
        total_tokens: 30,
        token_speed: 20.0 / latency,
    }
}

#[test]
fn summary_lists_performance_metrics() {
    let result = aggregate(vec![success(0, 2.0), success(1, 4.0)], 4.0, 2);
    let text = render_summary(&result);
    assert!(text.contains("Concurrency level: 2"));
    assert!(text.contains("Successful requests: 2/2"));
    assert!(text.contains("Average latency: 3.00 seconds"));
    assert!(text.contains("Overall token generation speed: 10.00 tokens/second"));
    assert!(text.contains("Total output tokens: 40"));
    assert!(!text.contains("P99"));
}

#[test]
fn summary_shows_p99_when_present() {
    let batch = (0..120).map(|i| success(i, 1.0 + i as f64 / 100.0)).collect();
    let text = render_summary(&aggregate(batch, 3.0, 120));
    assert!(text.contains("P99 latency: "));
}

#[test]
fn summary_for_all_failed_run() {
    let batch = vec![RequestOutcome::Failure { request_id: 0, latency: None, error: "HTTP 500: server error".into() }];
    let text = render_summary(&aggregate(batch, 0.5, 1));
    assert!(text.contains("Successful requests: 0/1"));
    assert!(text.contains("All requests failed. Sample error: HTTP 500: server error"));
}

#[test]
fn file_name_uses_compact_timestamp() {
    let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    assert_eq!(report_file_name(&ts), "loadgen_concurrency_test_20240309-070501.json");
}

#[test]
fn json_file_round_trips_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let result = aggregate(vec![success(0, 2.0)], 2.0, 1);
    let path = write_json(&result, dir.path()).unwrap();

    assert!(path.starts_with(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("loadgen_concurrency_test_") && name.ends_with(".json"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"concurrency\": 1"));
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["successful_requests"], 1);
    assert!(v["p99_latency"].is_null());
    assert!(matches!(result, AggregateResult::Completed(_)));
}

#[test]
fn writing_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let result = aggregate(Vec::new(), 0.0, 0);
    assert!(write_json(&result, &missing).is_err());
}
