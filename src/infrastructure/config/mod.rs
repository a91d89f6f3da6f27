use anyhow::Context;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::tts::SynthesisDefaults;

pub const DEFAULT_TTS_BASE_URL: &str = "https://ai.gitee.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Remote TTS endpoint
    pub tts_api_key: String,
    pub tts_base_url: String,
    /// `None` leaves calls without a client-side timeout
    pub tts_request_timeout: Option<Duration>,
    pub tts_pacing_interval: Duration,
    pub tts_max_retries: u32,
    pub tts_retry_delay: Duration,
    pub tts_max_batch_items: usize,
    pub tts_defaults: SynthesisDefaults,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = SynthesisDefaults::default();

        let timeout_secs: u64 = parse(&lookup, "TTS_REQUEST_TIMEOUT_SECS", 120)?;

        let environment = match var("ENVIRONMENT", "development").as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        // Production defaults to JSON logs
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some(_) => LogFormat::Pretty,
            None if environment == Environment::Production => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let config = Config {
            host: var("HOST", "127.0.0.1"),
            port: parse(&lookup, "PORT", 8787)?,
            environment,
            log_format,
            tts_api_key: var("TTS_API_KEY", ""),
            tts_base_url: var("TTS_BASE_URL", DEFAULT_TTS_BASE_URL),
            tts_request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            tts_pacing_interval: Duration::from_millis(parse(
                &lookup,
                "TTS_PACING_INTERVAL_MS",
                1000,
            )?),
            tts_max_retries: parse(&lookup, "TTS_MAX_RETRIES", 0)?,
            tts_retry_delay: Duration::from_millis(parse(&lookup, "TTS_RETRY_DELAY_MS", 2000)?),
            tts_max_batch_items: parse(&lookup, "TTS_MAX_BATCH_ITEMS", 100)?,
            tts_defaults: SynthesisDefaults {
                voice: var("TTS_DEFAULT_VOICE", defaults.voice.as_str()),
                model: var("TTS_DEFAULT_MODEL", defaults.model.as_str()),
                prompt_audio_url: var("TTS_PROMPT_AUDIO_URL", defaults.prompt_audio_url.as_str()),
                prompt_text: var("TTS_PROMPT_TEXT", defaults.prompt_text.as_str()),
                emo_text: var("TTS_EMO_TEXT", defaults.emo_text.as_str()),
                use_emo_text: lookup("TTS_USE_EMO_TEXT")
                    .map(|s| s.to_lowercase() != "false")
                    .unwrap_or(defaults.use_emo_text),
            },
        };

        Ok(config)
    }

    pub fn has_api_key(&self) -> bool {
        !self.tts_api_key.trim().is_empty()
    }
}

fn parse<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
