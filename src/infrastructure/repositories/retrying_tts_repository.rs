use super::tts_repository::TtsRepository;
use crate::domain::tts::{SynthesisError, SynthesisOptions, SynthesizedAudio};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Bounded retry decorator around another [`TtsRepository`].
///
/// The wrapped client never retries on its own; this layer repeats a call
/// only for retryable failures, with a fixed delay between attempts.
pub struct RetryingTtsRepository {
    inner: Arc<dyn TtsRepository>,
    max_retries: u32,
    retry_delay: Duration,
}

impl RetryingTtsRepository {
    pub fn new(inner: Arc<dyn TtsRepository>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            retry_delay,
        }
    }
}

#[async_trait]
impl TtsRepository for RetryingTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let mut attempt = 0;
        loop {
            match self.inner.synthesize(text, options).await {
                Ok(audio) => return Ok(audio),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        retry_delay_ms = self.retry_delay.as_millis(),
                        "TTS call failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
