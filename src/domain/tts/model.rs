use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::SynthesisError;

pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_MODEL: &str = "IndexTTS-2";
pub const DEFAULT_PROMPT_AUDIO_URL: &str = "https://raw.githubusercontent.com/hdapeng/kelong-audio/master/kelong-audio/%E5%85%8B%E9%9A%86%E9%9F%B3%E8%89%B2.MP3";
pub const DEFAULT_PROMPT_TEXT: &str =
    "对我来讲是一种荣幸，但是也是压力蛮大的。不过我觉得是一种呃很好的一个挑战。";
pub const DEFAULT_EMO_TEXT: &str = "你吓死我了！你是鬼吗？";

/// Caller-supplied voice/model options. Absent fields fall back to
/// [`SynthesisDefaults`] when the request is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emo_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_emo_text: Option<bool>,
}

/// Values used for every option the caller leaves unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisDefaults {
    pub voice: String,
    pub model: String,
    pub prompt_audio_url: String,
    pub prompt_text: String,
    pub emo_text: String,
    pub use_emo_text: bool,
}

impl Default for SynthesisDefaults {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt_audio_url: DEFAULT_PROMPT_AUDIO_URL.to_string(),
            prompt_text: DEFAULT_PROMPT_TEXT.to_string(),
            emo_text: DEFAULT_EMO_TEXT.to_string(),
            use_emo_text: true,
        }
    }
}

/// JSON payload for `POST {base_url}/audio/speech`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub input: String,
    pub model: String,
    pub voice: String,
    pub prompt_audio_url: String,
    pub prompt_text: String,
    pub emo_text: String,
    pub use_emo_text: bool,
}

impl SynthesisRequest {
    /// Resolve `options` against `defaults`. Empty strings count as unset,
    /// the text itself is passed through untouched.
    pub fn new(text: &str, options: &SynthesisOptions, defaults: &SynthesisDefaults) -> Self {
        fn pick(value: &Option<String>, fallback: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        }

        Self {
            input: text.to_string(),
            model: pick(&options.model, &defaults.model),
            voice: pick(&options.voice, &defaults.voice),
            prompt_audio_url: pick(&options.prompt_audio_url, &defaults.prompt_audio_url),
            prompt_text: pick(&options.prompt_text, &defaults.prompt_text),
            emo_text: pick(&options.emo_text, &defaults.emo_text),
            use_emo_text: options.use_emo_text.unwrap_or(defaults.use_emo_text),
        }
    }
}

/// Audio returned by one successful call
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub audio: Vec<u8>,
    pub elapsed: Duration,
}

impl SynthesizedAudio {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Tagged per-item result of a batch.
///
/// Unlike the bytes-only view, this keeps "failed" and "legitimately empty"
/// apart.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Success { audio: Vec<u8>, elapsed: Duration },
    Failure { reason: String, status: Option<u16> },
    /// The batch was cancelled before this item was attempted.
    Cancelled,
}

impl SynthesisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Audio bytes, or the zero-length placeholder for anything but success
    pub fn audio(&self) -> &[u8] {
        match self {
            Self::Success { audio, .. } => audio,
            Self::Failure { .. } | Self::Cancelled => &[],
        }
    }

    pub fn into_audio(self) -> Vec<u8> {
        match self {
            Self::Success { audio, .. } => audio,
            Self::Failure { .. } | Self::Cancelled => Vec::new(),
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failure { reason, .. } => Some(reason),
            Self::Success { .. } | Self::Cancelled => None,
        }
    }
}

impl From<Result<SynthesizedAudio, SynthesisError>> for SynthesisOutcome {
    fn from(result: Result<SynthesizedAudio, SynthesisError>) -> Self {
        match result {
            Ok(SynthesizedAudio { audio, elapsed }) => Self::Success { audio, elapsed },
            Err(err) => Self::Failure {
                status: err.status(),
                reason: err.to_string(),
            },
        }
    }
}
