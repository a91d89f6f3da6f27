use axum::Router;
use std::sync::Arc;

use crate::controllers::tts::TtsController;
use crate::domain::tts::{PacingPolicy, TtsService};
use crate::infrastructure::config::Config;
use crate::infrastructure::http::build_router;
use crate::infrastructure::repositories::{
    HttpTtsRepository, RetryingTtsRepository, TtsRepository,
};

/// Wire every component from configuration and return the application router
pub fn create_app(config: Arc<Config>) -> anyhow::Result<Router> {
    // === DEPENDENCY INJECTION SETUP ===
    // 1. Remote TTS client, optionally wrapped with bounded retries
    let http_repo: Arc<dyn TtsRepository> = Arc::new(HttpTtsRepository::new(
        &config.tts_base_url,
        config.tts_api_key.clone(),
        config.tts_defaults.clone(),
        config.tts_request_timeout,
    )?);
    let tts_repo: Arc<dyn TtsRepository> = if config.tts_max_retries > 0 {
        Arc::new(RetryingTtsRepository::new(
            http_repo,
            config.tts_max_retries,
            config.tts_retry_delay,
        ))
    } else {
        http_repo
    };

    // 2. Services
    let tts_service = Arc::new(TtsService::new(
        tts_repo,
        PacingPolicy::fixed(config.tts_pacing_interval),
        config.tts_defaults.clone(),
    ));

    // 3. Controllers
    let tts_controller = Arc::new(TtsController::new(
        tts_service,
        config.tts_max_batch_items,
    ));

    Ok(build_router(config, tts_controller))
}
