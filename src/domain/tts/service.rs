use super::batch::{run_batch_observed, BatchEntry, BatchProgress};
use super::dispatcher::{EngineDispatcher, EngineReadiness};
use super::dto::{SynthesisOptions, TtsRequest};
use super::engine::Engine;
use super::error::TtsServiceError;
use super::item::{parse_csv_items, TextItem};
use super::packager::{package_batch, package_single, DeliveryPayload, SINGLE_FILENAME};
use super::voice::VoiceParams;
use async_trait::async_trait;
use std::sync::Arc;

pub struct TtsService {
    dispatcher: Arc<EngineDispatcher>,
    default_engine: Engine,
    max_chars: usize,
}

impl TtsService {
    pub fn new(dispatcher: Arc<EngineDispatcher>, default_engine: Engine, max_chars: usize) -> Self {
        Self {
            dispatcher,
            default_engine,
            max_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn default_engine(&self) -> Engine {
        self.default_engine
    }

    pub fn readiness(&self) -> EngineReadiness {
        self.dispatcher.readiness()
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize one piece of text into a single MP3
    ///
    /// This operation:
    /// - Validates engine, voice settings and text length
    /// - Resolves the engine (policy and availability checks)
    /// - Synthesizes, transcoding when the engine renders WAV
    async fn synthesize(&self, request: TtsRequest) -> Result<DeliveryPayload, TtsServiceError>;

    /// Synthesize every usable row of an uploaded CSV into a ZIP of MP3s
    async fn synthesize_csv(
        &self,
        csv: &[u8],
        options: SynthesisOptions,
    ) -> Result<DeliveryPayload, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: TtsRequest) -> Result<DeliveryPayload, TtsServiceError> {
        let (engine, params) = self.parse_options(&request.options)?;

        let item = TextItem::new(SINGLE_FILENAME, &request.text)?;
        item.validate(self.max_chars)?;

        tracing::info!(
            engine = %engine,
            text_length = item.char_count(),
            "TTS synthesis request"
        );

        let synthesizer = self.dispatcher.resolve(engine, &params)?;
        let blob = synthesizer.synthesize(item.text()).await?;

        Ok(package_single(blob))
    }

    async fn synthesize_csv(
        &self,
        csv: &[u8],
        options: SynthesisOptions,
    ) -> Result<DeliveryPayload, TtsServiceError> {
        let (engine, params) = self.parse_options(&options)?;
        let items = parse_csv_items(csv)?;

        tracing::info!(
            engine = %engine,
            csv_size = csv.len(),
            rows = items.len(),
            "TTS batch request"
        );

        let entries = self
            .synthesize_items(items, engine, &params, |_| {})
            .await?;

        let payload = package_batch(&entries)?;
        tracing::info!(
            entries = entries.len(),
            archive_size = payload.bytes.len(),
            "TTS batch archived"
        );

        Ok(payload)
    }
}

impl TtsService {
    /// Resolve the engine and run a batch over already-parsed items
    pub async fn synthesize_items<F>(
        &self,
        items: Vec<TextItem>,
        engine: Engine,
        params: &VoiceParams,
        on_progress: F,
    ) -> Result<Vec<BatchEntry>, TtsServiceError>
    where
        F: FnMut(BatchProgress<'_>) + Send,
    {
        let synthesizer = self.dispatcher.resolve(engine, params)?;
        run_batch_observed(items, &synthesizer, self.max_chars, on_progress).await
    }

    /// Turn raw request options into a validated engine choice and voice parameters
    pub fn parse_options(
        &self,
        options: &SynthesisOptions,
    ) -> Result<(Engine, VoiceParams), TtsServiceError> {
        let engine = match options.engine.as_deref() {
            None => self.default_engine,
            Some(raw) => raw.parse()?,
        };

        let params = VoiceParams::new(
            options.lang.as_deref(),
            options.voice.as_deref(),
            options.rate,
            options.volume,
        )?;

        Ok((engine, params))
    }
}
