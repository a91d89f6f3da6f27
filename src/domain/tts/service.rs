use super::batch::{BatchReport, BatchSynthesizer, ProgressObserver};
use super::catalog::{is_known_model, is_known_voice};
use super::error::SynthesisError;
use super::model::{SynthesisDefaults, SynthesisOptions, SynthesizedAudio};
use super::pacing::PacingPolicy;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    batch: BatchSynthesizer,
    defaults: SynthesisDefaults,
}

impl TtsService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        pacing: PacingPolicy,
        defaults: SynthesisDefaults,
    ) -> Self {
        let batch = BatchSynthesizer::new(tts_repo.clone(), pacing);
        Self {
            tts_repo,
            batch,
            defaults,
        }
    }

    pub fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize a single text.
    ///
    /// Failures are returned as-is so the caller sees the exact kind
    /// (network, remote status, decode).
    async fn synthesize(
        &self,
        text: String,
        options: SynthesisOptions,
    ) -> Result<SynthesizedAudio, SynthesisError>;

    /// Synthesize an ordered list of texts.
    ///
    /// Never fails as a whole: the report has one outcome per input.
    async fn synthesize_batch(
        &self,
        texts: Vec<String>,
        options: SynthesisOptions,
        observer: Option<&dyn ProgressObserver>,
        cancel: CancellationToken,
    ) -> BatchReport;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: String,
        options: SynthesisOptions,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        tracing::info!(
            text_length = text.len(),
            voice = ?options.voice,
            model = ?options.model,
            "TTS synthesis request"
        );
        self.warn_unknown_options(&options);

        self.tts_repo.synthesize(&text, &options).await
    }

    async fn synthesize_batch(
        &self,
        texts: Vec<String>,
        options: SynthesisOptions,
        observer: Option<&dyn ProgressObserver>,
        cancel: CancellationToken,
    ) -> BatchReport {
        tracing::info!(
            item_count = texts.len(),
            total_characters = texts.iter().map(|t| t.chars().count()).sum::<usize>(),
            voice = ?options.voice,
            model = ?options.model,
            "TTS batch request"
        );
        self.warn_unknown_options(&options);

        self.batch.run(&texts, &options, observer, &cancel).await
    }
}

impl TtsService {
    /// Unknown names are forwarded anyway; the remote service decides
    fn warn_unknown_options(&self, options: &SynthesisOptions) {
        if let Some(voice) = options.voice.as_deref().filter(|v| !is_known_voice(v)) {
            tracing::warn!(voice = voice, "Voice is not in the known catalog");
        }
        if let Some(model) = options.model.as_deref().filter(|m| !is_known_model(m)) {
            tracing::warn!(model = model, "Model is not in the known catalog");
        }
    }
}
