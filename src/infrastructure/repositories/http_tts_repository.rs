use super::tts_repository::TtsRepository;
use crate::domain::tts::{
    SynthesisDefaults, SynthesisError, SynthesisOptions, SynthesisRequest, SynthesizedAudio,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::{Duration, Instant};

/// Longest slice of an unexpected response body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 500;

/// OpenAI-compatible `/audio/speech` client.
///
/// One instance is built at startup and injected wherever synthesis is needed;
/// the API key and base URL come from configuration.
pub struct HttpTtsRepository {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    defaults: SynthesisDefaults,
}

impl HttpTtsRepository {
    pub fn new(
        base_url: &str,
        api_key: String,
        defaults: SynthesisDefaults,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            endpoint: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            api_key,
            defaults,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }

    /// Send one resolved request and read the audio body
    async fn send(&self, request: SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            voice = %request.voice,
            text_length = request.input.len(),
            "Calling TTS API"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthesisError::Network(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());

            return Err(SynthesisError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") || content_type.starts_with("text/") {
            let body = response.text().await.map_err(body_error)?;
            return Err(SynthesisError::Decode(format!(
                "expected audio but received {}: {}",
                content_type,
                truncate(&body)
            )));
        }

        let bytes = response.bytes().await.map_err(body_error)?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for HttpTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let request = SynthesisRequest::new(text, options, &self.defaults);
        let model = request.model.clone();
        let voice = request.voice.clone();

        let start_time = Instant::now();
        let result = self.send(request).await;
        let elapsed = start_time.elapsed();

        match result {
            Ok(audio) => {
                tracing::info!(
                    provider = "http",
                    model = %model,
                    voice = %voice,
                    latency_ms = elapsed.as_millis(),
                    characters_count = text.chars().count(),
                    audio_size_bytes = audio.len(),
                    "TTS synthesis completed"
                );
                Ok(SynthesizedAudio { audio, elapsed })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model = %model,
                    voice = %voice,
                    latency_ms = elapsed.as_millis(),
                    text_length = text.len(),
                    "TTS API call failed"
                );
                Err(e)
            }
        }
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

/// Timeouts while reading the body count as transport failures
fn body_error(err: reqwest::Error) -> SynthesisError {
    if err.is_timeout() {
        SynthesisError::Network(describe_transport_error(&err))
    } else {
        SynthesisError::Decode(err.to_string())
    }
}

/// Pull the human-readable part out of an error body.
///
/// OpenAI-style services answer `{"error": {"message": ...}}`; some answer
/// `{"message": ...}` or `{"error": "..."}`; anything else is used verbatim.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str());
        if let Some(message) = message {
            return Some(message.to_string());
        }
    }

    Some(truncate(trimmed))
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
