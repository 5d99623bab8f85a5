use std::collections::HashMap;
use std::io::Write;

use loadgen_common::config::LoadTestConfig;
use loadgen_common::LoadgenError;

#[test]
fn defaults_are_valid() {
    let cfg = LoadTestConfig::default();
    assert_eq!(cfg.concurrency, 500);
    assert_eq!(cfg.max_tokens, 100);
    assert!(cfg.validate().is_ok());
}

#[test]
fn env_overrides_apply_and_bad_numbers_are_ignored() {
    let vars: HashMap<&str, &str> = [
        ("LOADGEN_ENDPOINT", "http://127.0.0.1:9000/v1/chat/completions"),
        ("LOADGEN_CONCURRENCY", "12"),
        ("LOADGEN_MAX_TOKENS", "not-a-number"),
        ("LOADGEN_TIMEOUT_SECS", "30"),
    ]
    .into_iter()
    .collect();
    let mut cfg = LoadTestConfig::default();
    cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.endpoint, "http://127.0.0.1:9000/v1/chat/completions");
    assert_eq!(cfg.concurrency, 12);
    assert_eq!(cfg.max_tokens, 100);
    assert_eq!(cfg.request_timeout_secs, Some(30));
}

#[test]
fn yaml_fills_missing_keys_with_defaults() {
    let cfg = LoadTestConfig::from_yaml_str("concurrency: 3\nprompt: hi\n").unwrap();
    assert_eq!(cfg.concurrency, 3);
    assert_eq!(cfg.prompt, "hi");
    assert_eq!(cfg.model, LoadTestConfig::default().model);
}

#[test]
fn yaml_file_round_trips_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "endpoint: https://example.com/v1/chat/completions\nmax_tokens: 8").unwrap();
    let cfg = LoadTestConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.max_tokens, 8);
    assert!(cfg.validate().is_ok());
}

#[test]
fn malformed_yaml_is_an_error() {
    let err = LoadTestConfig::from_yaml_str("concurrency: [").unwrap_err();
    assert!(matches!(err, LoadgenError::ConfigFile(_)));
}

#[test]
fn validation_rejects_bad_values() {
    let zero = LoadTestConfig { concurrency: 0, ..Default::default() };
    assert!(matches!(zero.validate(), Err(LoadgenError::InvalidConfig(_))));

    let no_tokens = LoadTestConfig { max_tokens: 0, ..Default::default() };
    assert!(no_tokens.validate().is_err());

    let bad_url = LoadTestConfig { endpoint: "not a url".into(), ..Default::default() };
    assert!(bad_url.validate().is_err());

    let ftp = LoadTestConfig { endpoint: "ftp://example.com/x".into(), ..Default::default() };
    assert!(ftp.validate().is_err());

    let zero_timeout = LoadTestConfig { request_timeout_secs: Some(0), ..Default::default() };
    assert!(zero_timeout.validate().is_err());
}
