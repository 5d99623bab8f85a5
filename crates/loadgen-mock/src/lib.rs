//! Mock chat-completions target (OpenAI subset) for dry runs and end-to-end tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct MockSettings {
    pub delay: Duration,
    /// Upper bound of a uniform random extra delay per request.
    pub jitter: Duration,
    pub completion_tokens: u32,
    /// When set, every request is answered with this status and `fail_body`.
    pub fail_status: Option<u16>,
    pub fail_body: String,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(50),
            jitter: Duration::ZERO,
            completion_tokens: 100,
            fail_status: None,
            fail_body: "server error".into(),
        }
    }
}

impl MockSettings {
    /// Rejects a `fail_status` that is not a valid HTTP status code.
    pub fn validate(&self) -> std::io::Result<()> {
        if let Some(status) = self.fail_status {
            StatusCode::from_u16(status).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("fail status {}: {}", status, e))
            })?;
        }
        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    settings: Arc<MockSettings>,
    requests_total: Arc<AtomicU64>,
}

pub fn app(settings: MockSettings) -> Router {
    let state = AppState {
        settings: Arc::new(settings),
        requests_total: Arc::new(AtomicU64::new(0)),
    };
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, settings: MockSettings) -> std::io::Result<()> {
    settings.validate()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "mock", "listening on http://{}", listener.local_addr()?);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!(target: "mock", "shutdown signal received");
    };
    axum::serve(listener, app(settings))
        .with_graceful_shutdown(shutdown)
        .await
}

#[derive(serde::Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(serde::Deserialize)]
struct ChatRequest {
    model: Option<String>,
    messages: Vec<ChatMessage>,
    max_tokens: Option<u32>,
}

#[derive(serde::Serialize)]
struct ChatChoiceMessage { role: String, content: String }

#[derive(serde::Serialize)]
struct ChatChoice { index: u32, message: ChatChoiceMessage, finish_reason: String }

#[derive(serde::Serialize)]
struct Usage { prompt_tokens: u64, completion_tokens: u64, total_tokens: u64 }

#[derive(serde::Serialize)]
struct ChatResponse {
    id: String,
    object: String,
    model: String,
    choices: Vec<ChatChoice>,
    usage: Usage,
}

async fn chat_completions(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let n = state.requests_total.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::debug!(target: "mock", "chat request #{}: {} messages", n, req.messages.len());
    let settings = &state.settings;
    tokio::time::sleep(settings.delay + jitter(settings.jitter)).await;

    if let Some(status) = settings.fail_status {
        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (code, settings.fail_body.clone()).into_response();
    }

    let prompt_tokens: u64 = req.messages.iter().map(|m| m.content.split_whitespace().count() as u64).sum();
    let completion_tokens = req
        .max_tokens
        .map_or(settings.completion_tokens, |max| max.min(settings.completion_tokens)) as u64;
    let content = vec!["token"; completion_tokens as usize].join(" ");

    Json(ChatResponse {
        id: format!("chatcmpl-{}", n),
        object: "chat.completion".into(),
        model: req.model.unwrap_or_else(|| "mock".into()),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatChoiceMessage { role: "assistant".into(), content },
            finish_reason: "length".into(),
        }],
        usage: Usage { prompt_tokens, completion_tokens, total_tokens: prompt_tokens + completion_tokens },
    })
    .into_response()
}

fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let ms = rand::thread_rng().gen_range(0..=max.as_millis() as u64);
    Duration::from_millis(ms)
}
