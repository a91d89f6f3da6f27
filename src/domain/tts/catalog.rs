/// Voices accepted by the OpenAI-compatible speech endpoint
pub const AVAILABLE_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Models offered by the speech endpoint
pub const AVAILABLE_MODELS: &[&str] = &["IndexTTS-2", "tts-1", "tts-1-hd"];

pub fn is_known_voice(voice: &str) -> bool {
    AVAILABLE_VOICES.contains(&voice)
}

pub fn is_known_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}
