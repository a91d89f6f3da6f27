pub mod batch;
pub mod catalog;
pub mod error;
pub mod model;
pub mod pacing;
pub mod service;

pub use batch::{
    BatchProgress, BatchReport, BatchResult, BatchState, BatchSynthesizer, ItemFailure,
    ProgressObserver,
};
pub use catalog::{AVAILABLE_MODELS, AVAILABLE_VOICES};
pub use error::SynthesisError;
pub use model::{
    SynthesisDefaults, SynthesisOptions, SynthesisOutcome, SynthesisRequest, SynthesizedAudio,
};
pub use pacing::PacingPolicy;
pub use service::{TtsService, TtsServiceApi};
