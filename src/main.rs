use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubevoice_backend::app::create_app;
use tubevoice_backend::infrastructure::config::{Config, LogFormat};
use tubevoice_backend::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting TubeVoice Backend on {}:{}",
        config.host,
        config.port
    );

    if !config.has_api_key() {
        tracing::warn!("TTS_API_KEY is not set. Synthesis requests will be rejected by the remote service until it is configured");
    }

    tracing::info!(
        base_url = %config.tts_base_url,
        timeout_secs = ?config.tts_request_timeout.map(|t| t.as_secs()),
        pacing_ms = config.tts_pacing_interval.as_millis(),
        max_retries = config.tts_max_retries,
        default_voice = %config.tts_defaults.voice,
        default_model = %config.tts_defaults.model,
        "TTS client configuration"
    );

    let config = Arc::new(config);

    let app = create_app(config.clone())?;

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tubevoice_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
