use neonvox_backend::infrastructure::config::{Config, LogFormat};
use neonvox_backend::infrastructure::engines::build_tts_service;
use neonvox_backend::infrastructure::http::start_http_server;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting NeonVox TTS API on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        development = config.is_development(),
        default_engine = %config.default_engine,
        max_chars = config.max_chars,
        allow_cloud = config.allow_cloud,
        synthesis_timeout_secs = config.synthesis_timeout_secs,
        "Synthesis settings loaded"
    );

    // Probe engines and build the service
    let tts_service = Arc::new(build_tts_service(&config)?);

    start_http_server(Arc::new(config), tts_service).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "neonvox_backend=debug,tower_http=debug".into());

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
