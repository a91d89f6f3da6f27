use crate::domain::tts::{SynthesisError, SynthesisOptions, SynthesizedAudio};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the remote speech provider behind a single call.
///
/// Implementations are responsible for:
/// - Resolving unset options against their configured defaults
/// - Performing exactly one synthesis per call (retries live in decorators)
/// - Classifying failures into [`SynthesisError`] kinds
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize `text` with the given options
    ///
    /// Returns the raw audio bytes and the wall-clock time of the call
    ///
    /// # Arguments
    /// * `text` - Text to speak; empty text is forwarded, not rejected
    /// * `options` - Voice/model options, unset fields use defaults
    ///
    /// # Errors
    /// Returns [`SynthesisError`] for transport, remote status or decoding failures
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesizedAudio, SynthesisError>;
}
