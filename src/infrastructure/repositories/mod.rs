pub mod http_tts_repository;
pub mod retrying_tts_repository;
pub mod tts_repository;

pub use http_tts_repository::HttpTtsRepository;
pub use retrying_tts_repository::RetryingTtsRepository;
pub use tts_repository::TtsRepository;
