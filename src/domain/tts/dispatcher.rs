use std::sync::Arc;
use std::time::{Duration, Instant};

use super::engine::Engine;
use super::error::TtsServiceError;
use super::packager::AudioBlob;
use super::voice::{VoiceParams, VoicePreference};
use crate::infrastructure::repositories::{
    CloudTtsRepository, LocalTtsRepository, TranscodeError, Transcoder,
};

pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Administrative switches on top of capability probes
#[derive(Debug, Clone, Copy)]
pub struct EnginePolicy {
    pub allow_cloud: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self { allow_cloud: true }
    }
}

/// Capability snapshot, as reported by the readiness endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct EngineReadiness {
    pub cloud_available: bool,
    pub cloud_allowed: bool,
    pub local_available: bool,
    pub transcoder_available: bool,
}

/// Resolves an engine choice into a [`Synthesizer`] after checking policy and availability
pub struct EngineDispatcher {
    cloud: Arc<dyn CloudTtsRepository>,
    local: Arc<dyn LocalTtsRepository>,
    transcoder: Arc<dyn Transcoder>,
    policy: EnginePolicy,
    synthesis_timeout: Duration,
}

impl EngineDispatcher {
    pub fn new(
        cloud: Arc<dyn CloudTtsRepository>,
        local: Arc<dyn LocalTtsRepository>,
        transcoder: Arc<dyn Transcoder>,
        policy: EnginePolicy,
    ) -> Self {
        Self {
            cloud,
            local,
            transcoder,
            policy,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    pub fn readiness(&self) -> EngineReadiness {
        EngineReadiness {
            cloud_available: self.cloud.is_available(),
            cloud_allowed: self.policy.allow_cloud,
            local_available: self.local.is_available(),
            transcoder_available: self.transcoder.is_available(),
        }
    }

    pub fn resolve(
        &self,
        engine: Engine,
        params: &VoiceParams,
    ) -> Result<Synthesizer, TtsServiceError> {
        let strategy = match engine {
            Engine::Cloud => {
                if !self.policy.allow_cloud {
                    return Err(TtsServiceError::PolicyDenied(
                        "cloud engine is disabled by server policy".to_string(),
                    ));
                }
                if !self.cloud.is_available() {
                    return Err(TtsServiceError::BackendUnavailable(
                        "cloud engine is not configured. Check NEONVOX_CLOUD_BASE_URL".to_string(),
                    ));
                }
                Strategy::Cloud {
                    repo: self.cloud.clone(),
                    language: params.language.clone(),
                }
            }
            Engine::Local => {
                if !self.local.is_available() {
                    return Err(TtsServiceError::BackendUnavailable(
                        "local engine not installed. Install espeak-ng or set NEONVOX_ESPEAK_BIN"
                            .to_string(),
                    ));
                }
                if !self.transcoder.is_available() {
                    return Err(TtsServiceError::TranscoderUnavailable(
                        "ffmpeg not installed. Install ffmpeg or set NEONVOX_FFMPEG_BIN"
                            .to_string(),
                    ));
                }
                Strategy::Local {
                    repo: self.local.clone(),
                    transcoder: self.transcoder.clone(),
                    voice: params.voice.clone(),
                    rate: params.rate,
                    volume: params.volume,
                }
            }
        };

        tracing::debug!(engine = %engine, "Engine resolved");

        Ok(Synthesizer {
            engine,
            strategy,
            timeout: self.synthesis_timeout,
        })
    }
}

enum Strategy {
    Cloud {
        repo: Arc<dyn CloudTtsRepository>,
        language: String,
    },
    Local {
        repo: Arc<dyn LocalTtsRepository>,
        transcoder: Arc<dyn Transcoder>,
        voice: Option<VoicePreference>,
        rate: Option<u32>,
        volume: Option<f32>,
    },
}

/// Turns text into MP3 audio with one resolved engine and its settings
pub struct Synthesizer {
    engine: Engine,
    strategy: Strategy,
    timeout: Duration,
}

impl Synthesizer {
    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub async fn synthesize(&self, text: &str) -> Result<AudioBlob, TtsServiceError> {
        let start_time = Instant::now();

        let bytes = tokio::time::timeout(self.timeout, self.run(text))
            .await
            .map_err(|_| TtsServiceError::SynthesisTimeout(self.timeout.as_secs()))??;

        if bytes.is_empty() {
            return Err(TtsServiceError::Synthesis(format!(
                "{} engine returned no audio",
                self.engine
            )));
        }

        tracing::info!(
            engine = %self.engine,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.chars().count(),
            audio_size_bytes = bytes.len(),
            "TTS synthesis completed"
        );

        Ok(AudioBlob::mp3(bytes))
    }

    async fn run(&self, text: &str) -> Result<Vec<u8>, TtsServiceError> {
        match &self.strategy {
            Strategy::Cloud { repo, language } => repo
                .synthesize(text, language)
                .await
                .map_err(TtsServiceError::Synthesis),
            Strategy::Local {
                repo,
                transcoder,
                voice,
                rate,
                volume,
            } => {
                let mut session = repo
                    .open_session()
                    .await
                    .map_err(TtsServiceError::BackendUnavailable)?;

                if let Some(rate) = rate {
                    session.set_rate(*rate);
                }
                if let Some(volume) = volume {
                    session.set_volume(*volume);
                }
                if let Some(preference) = voice {
                    // An unreadable voice list leaves the default voice in place
                    match session.list_voices().await {
                        Ok(voices) => match preference.select(&voices) {
                            Some(selected) => {
                                tracing::debug!(
                                    preference = preference.as_str(),
                                    voice_id = %selected.id,
                                    voice_name = %selected.name,
                                    "Local voice selected"
                                );
                                session.select_voice(&selected.id);
                            }
                            None => tracing::debug!(
                                preference = preference.as_str(),
                                "No local voice matches preference, keeping default"
                            ),
                        },
                        Err(e) => tracing::warn!(error = %e, "Failed to list local voices"),
                    }
                }

                let wav = session
                    .synthesize_to_wav(text)
                    .await
                    .map_err(TtsServiceError::Synthesis)?;

                transcoder.wav_to_mp3(&wav).await.map_err(|e| match e {
                    TranscodeError::Unavailable(msg) => TtsServiceError::TranscoderUnavailable(msg),
                    TranscodeError::ConversionFailed(msg) => TtsServiceError::TranscodeFailed(msg),
                })
            }
        }
    }
}
