use std::sync::Arc;
use std::time::Duration;

use crate::domain::tts::{EngineDispatcher, EnginePolicy, TtsService};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{
    EspeakTtsRepository, FfmpegTranscoder, GoogleTtsRepository,
};

// translate_tts only answers browser-looking clients
const CLOUD_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) neonvox";

/// Instantiate the concrete engines from configuration and wire them into a service
pub fn build_tts_service(config: &Config) -> Result<TtsService, reqwest::Error> {
    let timeout = Duration::from_secs(config.synthesis_timeout_secs);

    let http_client = reqwest::Client::builder()
        .user_agent(CLOUD_USER_AGENT)
        .timeout(timeout)
        .build()?;

    let cloud = Arc::new(GoogleTtsRepository::new(
        http_client,
        config.cloud_base_url.clone(),
    ));
    let local = Arc::new(EspeakTtsRepository::new(
        config.espeak_binary.clone(),
        config.staging_dir.clone(),
    ));
    let transcoder = Arc::new(FfmpegTranscoder::new(
        config.ffmpeg_binary.clone(),
        config.staging_dir.clone(),
    ));

    let dispatcher = EngineDispatcher::new(
        cloud,
        local,
        transcoder,
        EnginePolicy {
            allow_cloud: config.allow_cloud,
        },
    )
    .with_synthesis_timeout(timeout);

    let readiness = dispatcher.readiness();
    tracing::info!(
        cloud_available = readiness.cloud_available,
        cloud_allowed = readiness.cloud_allowed,
        local_available = readiness.local_available,
        transcoder_available = readiness.transcoder_available,
        "Synthesis engines probed"
    );
    if !readiness.local_available || !readiness.transcoder_available {
        tracing::warn!(
            espeak = %config.espeak_binary,
            ffmpeg = %config.ffmpeg_binary,
            "Local engine will be rejected until espeak-ng and ffmpeg are installed"
        );
    }

    Ok(TtsService::new(
        Arc::new(dispatcher),
        config.default_engine,
        config.max_chars,
    ))
}
