use crate::error::AppError;

/// Failure of a single call to the remote synthesis service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// No response was received (connect failure, reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// The service answered, but the body is not audio.
    #[error("failed to decode audio response: {0}")]
    Decode(String),
}

impl SynthesisError {
    /// HTTP status returned by the service, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Whether repeating the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        match err.status() {
            Some(429) => AppError::RateLimitExceeded(err.to_string()),
            Some(400) | Some(422) => AppError::BadRequest(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}
