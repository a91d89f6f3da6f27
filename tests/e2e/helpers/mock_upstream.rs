use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::net::TcpListener;

pub const UPSTREAM_API_KEY: &str = "test-api-key";

/// Prefix that makes the mock answer with the status that follows, e.g. `fail:429`
pub const FAIL_PREFIX: &str = "fail:";

/// Prefix that makes the first call for an input answer 503 and later ones succeed
pub const FLAKY_PREFIX: &str = "flaky:";

/// Input that makes the mock answer 200 with a JSON document instead of audio
pub const JSON_BODY_INPUT: &str = "respond-with-json";

/// Audio the mock returns for a given input
pub fn fake_audio(input: &str) -> Vec<u8> {
    let mut audio = b"ID3".to_vec();
    audio.extend_from_slice(input.as_bytes());
    audio
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub at: Instant,
    pub authorization: Option<String>,
    pub payload: Value,
}

#[derive(Default)]
struct UpstreamState {
    calls: Mutex<Vec<RecordedCall>>,
}

/// In-process stand-in for the remote `/audio/speech` endpoint
pub struct MockTtsUpstream {
    pub base_url: String,
    state: Arc<UpstreamState>,
}

impl MockTtsUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(UpstreamState::default());
        let app = Router::new()
            .route("/v1/audio/speech", post(speech))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.payload["input"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

async fn speech(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.calls.lock().unwrap().push(RecordedCall {
        at: Instant::now(),
        authorization: authorization.clone(),
        payload: payload.clone(),
    });

    if authorization.as_deref() != Some(format!("Bearer {}", UPSTREAM_API_KEY).as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "invalid api key" } })),
        )
            .into_response();
    }

    let input = payload["input"].as_str().unwrap_or_default().to_string();

    if input.starts_with(FLAKY_PREFIX) {
        let attempts = state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.payload["input"] == payload["input"])
            .count();
        if attempts == 1 {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": { "message": "warming up" } })),
            )
                .into_response();
        }
    }

    if let Some(code) = input.strip_prefix(FAIL_PREFIX) {
        let status = code
            .parse::<u16>()
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            Json(json!({ "error": { "message": format!("rejected '{}'", input) } })),
        )
            .into_response();
    }

    if input == JSON_BODY_INPUT {
        return Json(json!({ "status": "queued" })).into_response();
    }

    ([(header::CONTENT_TYPE, "audio/mpeg")], fake_audio(&input)).into_response()
}
