use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::tts::{
        BatchProgress, BatchReport, ProgressObserver, SynthesisOptions, SynthesisOutcome,
        TtsService, TtsServiceApi, AVAILABLE_MODELS, AVAILABLE_VOICES,
    },
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
};

/// Request for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(flatten)]
    pub options: SynthesisOptions,
}

/// Request for POST /api/tts/batch
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTtsRequest {
    pub texts: Vec<String>,
    #[serde(flatten)]
    pub options: SynthesisOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItemResponse {
    pub index: usize,
    pub status: ItemStatus,
    pub audio_base64: Option<String>,
    pub audio_size: usize,
    pub elapsed_seconds: Option<f64>,
    pub error: Option<String>,
}

impl BatchItemResponse {
    fn from_outcome(index: usize, outcome: SynthesisOutcome) -> Self {
        match outcome {
            SynthesisOutcome::Success { audio, elapsed } => Self {
                index,
                status: ItemStatus::Succeeded,
                audio_size: audio.len(),
                audio_base64: Some(general_purpose::STANDARD.encode(&audio)),
                elapsed_seconds: Some(elapsed.as_secs_f64()),
                error: None,
            },
            SynthesisOutcome::Failure { reason, .. } => Self {
                index,
                status: ItemStatus::Failed,
                audio_base64: None,
                audio_size: 0,
                elapsed_seconds: None,
                error: Some(reason),
            },
            SynthesisOutcome::Cancelled => Self {
                index,
                status: ItemStatus::Cancelled,
                audio_base64: None,
                audio_size: 0,
                elapsed_seconds: None,
                error: None,
            },
        }
    }
}

/// Response for POST /api/tts/batch, items are index-aligned with `texts`
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTtsResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub completed_at: DateTime<Utc>,
    pub items: Vec<BatchItemResponse>,
}

impl From<BatchReport> for BatchTtsResponse {
    fn from(report: BatchReport) -> Self {
        let total = report.len();
        let succeeded = report.succeeded_count();
        let failed = report.failed_count();
        let cancelled = report.was_cancelled();
        let items = report
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| BatchItemResponse::from_outcome(index, outcome))
            .collect();

        Self {
            total,
            succeeded,
            failed,
            cancelled,
            completed_at: Utc::now(),
            items,
        }
    }
}

/// Response for the catalog endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub available: Vec<String>,
    pub default: String,
}

/// Logs per-item progress tagged with the request ID
struct RequestProgressLogger {
    request_id: String,
}

impl ProgressObserver for RequestProgressLogger {
    fn on_item_completed(&self, index: usize, outcome: &SynthesisOutcome, progress: BatchProgress) {
        tracing::info!(
            request_id = %self.request_id,
            item = index + 1,
            completed = progress.completed,
            total = progress.total,
            succeeded = outcome.is_success(),
            "Batch progress"
        );
    }
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
    max_batch_items: usize,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, max_batch_items: usize) -> Self {
        Self {
            tts_service,
            max_batch_items,
        }
    }

    /// POST /api/tts/synthesize - Convert one text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let result = controller
            .tts_service
            .synthesize(request.text, request.options)
            .await
            .map_err(AppError::from)?;

        let elapsed = HeaderValue::from_str(&format!("{:.3}", result.elapsed_seconds()))
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert("x-elapsed-seconds", elapsed);
        headers.insert("x-audio-size", HeaderValue::from(result.audio.len()));

        Ok((StatusCode::OK, headers, Body::from(result.audio)))
    }

    /// POST /api/tts/batch - Convert an ordered list of texts to speech
    ///
    /// The batch runs in its own task. If the client disconnects, axum drops
    /// this handler and the drop guard cancels the batch: no new items start
    /// and the remaining ones are reported as cancelled in the logs.
    pub async fn synthesize_batch(
        State(controller): State<Arc<TtsController>>,
        Extension(request_id): Extension<RequestId>,
        Json(request): Json<BatchTtsRequest>,
    ) -> AppResult<Json<BatchTtsResponse>> {
        if request.texts.len() > controller.max_batch_items {
            return Err(AppError::PayloadTooLarge(format!(
                "a batch may contain at most {} texts, got {}",
                controller.max_batch_items,
                request.texts.len()
            )));
        }

        let cancel = CancellationToken::new();
        let _cancel_on_disconnect = cancel.clone().drop_guard();

        let tts_service = controller.tts_service.clone();
        let batch = tokio::spawn(async move {
            let observer = RequestProgressLogger {
                request_id: request_id.0,
            };
            tts_service
                .synthesize_batch(request.texts, request.options, Some(&observer), cancel)
                .await
        });

        let report = batch
            .await
            .map_err(|e| AppError::Internal(format!("batch task failed: {}", e)))?;

        Ok(Json(BatchTtsResponse::from(report)))
    }

    /// GET /api/tts/voices
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<CatalogResponse> {
        Json(CatalogResponse {
            available: AVAILABLE_VOICES.iter().map(|v| v.to_string()).collect(),
            default: controller.tts_service.defaults().voice.clone(),
        })
    }

    /// GET /api/tts/models
    pub async fn list_models(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<CatalogResponse> {
        Json(CatalogResponse {
            available: AVAILABLE_MODELS.iter().map(|m| m.to_string()).collect(),
            default: controller.tts_service.defaults().model.clone(),
        })
    }
}
