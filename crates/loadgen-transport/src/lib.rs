//! HTTP transport seam for chat-completion requests

use std::error::Error as _;
use std::future::Future;
use std::time::Duration;

use loadgen_common::{LoadgenError, Result};
use serde_json::Value;

/// A completed response with its body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Shared by every concurrent dispatch of a run; implementations must only need `&self`.
pub trait ChatTransport: Send + Sync + 'static {
    fn post_json(&self, url: &str, body: &Value) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// Pooled reqwest client. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LoadgenError::Transport(describe(&e)))?;
        Ok(Self { client })
    }
}

impl ChatTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| LoadgenError::Transport(describe(&e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LoadgenError::Transport(describe(&e)))?;
        tracing::trace!(target: "loadgen", status, bytes = body.len(), "response received");
        Ok(TransportResponse { status, body })
    }
}

// reqwest's top-level message hides the root cause (e.g. "connection refused").
fn describe(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(feature = "mock")]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// What the scripted transport does for one call.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Respond { status: u16, body: String, delay: Duration },
        Fault { message: String, delay: Duration },
    }

    impl Reply {
        pub fn ok_usage(prompt: u64, completion: u64, delay: Duration) -> Self {
            let body = serde_json::json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "choices": [],
                "usage": {
                    "prompt_tokens": prompt,
                    "completion_tokens": completion,
                    "total_tokens": prompt + completion,
                }
            });
            Reply::Respond { status: 200, body: body.to_string(), delay }
        }

        pub fn status(status: u16, body: impl Into<String>) -> Self {
            Reply::Respond { status, body: body.into(), delay: Duration::ZERO }
        }

        pub fn fault(message: impl Into<String>, delay: Duration) -> Self {
            Reply::Fault { message: message.into(), delay }
        }
    }

    type Script = dyn Fn(usize, &Value) -> Reply + Send + Sync;

    /// Deterministic transport: the script picks a reply from the call index and request body.
    #[derive(Clone)]
    pub struct ScriptedTransport {
        script: Arc<Script>,
        calls: Arc<AtomicUsize>,
        last_url: Arc<std::sync::Mutex<Option<String>>>,
    }

    impl ScriptedTransport {
        pub fn new<F>(script: F) -> Self
        where
            F: Fn(usize, &Value) -> Reply + Send + Sync + 'static,
        {
            Self {
                script: Arc::new(script),
                calls: Arc::new(AtomicUsize::new(0)),
                last_url: Arc::new(std::sync::Mutex::new(None)),
            }
        }

        pub fn always(reply: Reply) -> Self {
            Self::new(move |_, _| reply.clone())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_url(&self) -> Option<String> {
            self.last_url.lock().ok().and_then(|g| g.clone())
        }
    }

    impl ChatTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut g) = self.last_url.lock() {
                *g = Some(url.to_string());
            }
            match (self.script)(index, body) {
                Reply::Respond { status, body, delay } => {
                    tokio::time::sleep(delay).await;
                    Ok(TransportResponse { status, body })
                }
                Reply::Fault { message, delay } => {
                    tokio::time::sleep(delay).await;
                    Err(LoadgenError::Transport(message))
                }
            }
        }
    }
}
