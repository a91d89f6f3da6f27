use super::model::{SynthesisOptions, SynthesisOutcome};
use super::pacing::PacingPolicy;
use crate::infrastructure::repositories::TtsRepository;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Bytes-only batch result: one entry per input, empty for failed items
pub type BatchResult = Vec<Vec<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn state(&self) -> BatchState {
        if self.completed >= self.total {
            BatchState::Completed
        } else if self.completed == 0 {
            BatchState::Pending
        } else {
            BatchState::InProgress
        }
    }
}

/// Notified after every item; cannot influence the batch outcome
pub trait ProgressObserver: Send + Sync {
    fn on_item_completed(&self, index: usize, outcome: &SynthesisOutcome, progress: BatchProgress);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub reason: String,
}

/// Tagged result of a batch run, index-aligned with the input texts
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    outcomes: Vec<SynthesisOutcome>,
    cancelled: bool,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[SynthesisOutcome] {
        &self.outcomes
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SynthesisOutcome::Failure { .. }))
            .count()
    }

    /// Indices that failed, with the recorded reason
    pub fn failures(&self) -> Vec<ItemFailure> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(index, outcome)| {
                outcome.failure_reason().map(|reason| ItemFailure {
                    index,
                    reason: reason.to_string(),
                })
            })
            .collect()
    }

    /// Drop the tags, keeping zero-length placeholders for non-successes
    pub fn into_audio(self) -> BatchResult {
        self.outcomes
            .into_iter()
            .map(SynthesisOutcome::into_audio)
            .collect()
    }
}

impl IntoIterator for BatchReport {
    type Item = SynthesisOutcome;
    type IntoIter = std::vec::IntoIter<SynthesisOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

/// Runs a list of texts through a [`TtsRepository`] strictly one at a time.
///
/// Guarantees the result has exactly one entry per input, in input order.
/// A failing item never stops the batch.
pub struct BatchSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    pacing: PacingPolicy,
}

impl BatchSynthesizer {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, pacing: PacingPolicy) -> Self {
        Self { tts_repo, pacing }
    }

    pub fn pacing(&self) -> PacingPolicy {
        self.pacing
    }

    /// Bytes-only form: failed items come back as empty byte vectors
    pub async fn synthesize_batch(
        &self,
        texts: &[String],
        options: &SynthesisOptions,
    ) -> BatchResult {
        self.run(texts, options, None, &CancellationToken::new())
            .await
            .into_audio()
    }

    /// Synthesize every text in order, pacing calls and recording each outcome.
    ///
    /// Cancellation stops new items from starting (an in-flight call is left to
    /// finish) and cuts a pending pacing sleep short. Items never started are
    /// reported as [`SynthesisOutcome::Cancelled`], so the report length always
    /// equals `texts.len()`.
    pub async fn run(
        &self,
        texts: &[String],
        options: &SynthesisOptions,
        observer: Option<&dyn ProgressObserver>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let total = texts.len();
        let mut outcomes = Vec::with_capacity(total);

        tracing::info!(
            total = total,
            pacing_ms = self.pacing.interval().as_millis(),
            "Starting TTS batch"
        );

        for (index, text) in texts.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    completed = index,
                    total = total,
                    "TTS batch cancelled, skipping remaining items"
                );
                break;
            }

            tracing::info!(
                item = index + 1,
                total = total,
                text_length = text.len(),
                "Synthesizing item {}/{}",
                index + 1,
                total
            );

            let outcome = SynthesisOutcome::from(self.tts_repo.synthesize(text, options).await);
            match &outcome {
                SynthesisOutcome::Failure { reason, status } => {
                    tracing::warn!(
                        item = index + 1,
                        total = total,
                        status = ?status,
                        reason = %reason,
                        "Batch item failed, keeping empty placeholder"
                    );
                }
                _ => {
                    tracing::debug!(
                        item = index + 1,
                        total = total,
                        audio_size = outcome.audio().len(),
                        "Batch item synthesized"
                    );
                }
            }

            if let Some(observer) = observer {
                observer.on_item_completed(
                    index,
                    &outcome,
                    BatchProgress {
                        completed: index + 1,
                        total,
                    },
                );
            }
            outcomes.push(outcome);

            let delay = self.pacing.delay_before_next(index, total);
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {}
                }
            }
        }

        let cancelled = outcomes.len() < total;
        outcomes.resize(total, SynthesisOutcome::Cancelled);

        let report = BatchReport {
            outcomes,
            cancelled,
        };

        tracing::info!(
            total = total,
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            cancelled = cancelled,
            "TTS batch finished"
        );

        report
    }
}
