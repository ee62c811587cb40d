use crate::domain::tts::{Engine, DEFAULT_MAX_CHARS};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CLOUD_BASE_URL: &str = "https://translate.google.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Synthesis
    pub max_chars: usize,
    pub default_engine: Engine,
    pub allow_cloud: bool,
    pub cloud_base_url: String,
    pub espeak_binary: String,
    pub ffmpeg_binary: String,
    pub staging_dir: Option<PathBuf>,
    pub synthesis_timeout_secs: u64,
    // Uploads
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            max_chars: DEFAULT_MAX_CHARS,
            default_engine: Engine::Cloud,
            allow_cloud: true,
            cloud_base_url: DEFAULT_CLOUD_BASE_URL.to_string(),
            espeak_binary: "espeak-ng".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
            staging_dir: None,
            synthesis_timeout_secs: 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            max_chars: env::var("NEONVOX_MAX_CHARS")
                .unwrap_or_else(|_| defaults.max_chars.to_string())
                .parse()?,
            default_engine: env::var("NEONVOX_DEFAULT_ENGINE")
                .unwrap_or_else(|_| defaults.default_engine.to_string())
                .parse::<Engine>()?,
            allow_cloud: env::var("NEONVOX_ALLOW_CLOUD")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(defaults.allow_cloud),
            cloud_base_url: env::var("NEONVOX_CLOUD_BASE_URL").unwrap_or(defaults.cloud_base_url),
            espeak_binary: env::var("NEONVOX_ESPEAK_BIN").unwrap_or(defaults.espeak_binary),
            ffmpeg_binary: env::var("NEONVOX_FFMPEG_BIN").unwrap_or(defaults.ffmpeg_binary),
            staging_dir: env::var("NEONVOX_STAGING_DIR").ok().map(PathBuf::from),
            synthesis_timeout_secs: env::var("NEONVOX_SYNTHESIS_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.synthesis_timeout_secs.to_string())
                .parse()?,
            max_upload_bytes: env::var("NEONVOX_MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| defaults.max_upload_bytes.to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
