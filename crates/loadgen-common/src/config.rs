use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::{LoadgenError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";
pub const DEFAULT_PROMPT: &str =
    "Explain the concept of machine learning in a few sentences. Keep your answer brief but informative.";

/// Everything a single load-test run needs, passed explicitly into the fan-out.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadTestConfig {
    pub endpoint: String,
    pub concurrency: usize,
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: PathBuf,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            concurrency: 500,
            prompt: DEFAULT_PROMPT.into(),
            model: "your_model_name".into(),
            max_tokens: 100,
            request_timeout_secs: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl LoadTestConfig {
    /// Reads `LOADGEN_CONFIG` (YAML) when set, otherwise defaults plus `LOADGEN_*` overrides.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var("LOADGEN_CONFIG") {
            return Self::from_yaml_file(path);
        }
        let mut cfg = Self::default();
        cfg.apply_env(|key| env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LOADGEN_*` variables through `lookup`; unparsable numbers are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LOADGEN_ENDPOINT") { self.endpoint = v; }
        if let Some(v) = lookup("LOADGEN_CONCURRENCY").and_then(|v| v.parse().ok()) { self.concurrency = v; }
        if let Some(v) = lookup("LOADGEN_PROMPT") { self.prompt = v; }
        if let Some(v) = lookup("LOADGEN_MODEL") { self.model = v; }
        if let Some(v) = lookup("LOADGEN_MAX_TOKENS").and_then(|v| v.parse().ok()) { self.max_tokens = v; }
        if let Some(v) = lookup("LOADGEN_TIMEOUT_SECS").and_then(|v| v.parse().ok()) { self.request_timeout_secs = Some(v); }
        if let Some(v) = lookup("LOADGEN_OUTPUT_DIR") { self.output_dir = PathBuf::from(v); }
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(LoadgenError::InvalidConfig("concurrency must be at least 1".into()));
        }
        if self.max_tokens == 0 {
            return Err(LoadgenError::InvalidConfig("max_tokens must be at least 1".into()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(LoadgenError::InvalidConfig("request timeout must be greater than zero".into()));
        }
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| LoadgenError::InvalidConfig(format!("invalid endpoint URL {}: {}", self.endpoint, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(LoadgenError::InvalidConfig(format!("unsupported endpoint scheme: {}", other))),
        }
    }
}
