use crate::domain::tts::VoiceInfo;
use async_trait::async_trait;

/// Repository for the online synthesis engine.
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
#[async_trait]
pub trait CloudTtsRepository: Send + Sync {
    /// Cheap capability probe, checked before a request is dispatched here
    fn is_available(&self) -> bool;

    /// Synthesize text in the given language
    ///
    /// Returns audio data ready for playback (MP3 format)
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String>;
}

/// Repository for the offline synthesis engine, which renders WAV.
///
/// Every synthesis call opens its own session so settings from one request
/// never carry over to another.
#[async_trait]
pub trait LocalTtsRepository: Send + Sync {
    fn is_available(&self) -> bool;

    async fn open_session(&self) -> Result<Box<dyn LocalTtsSession>, String>;
}

/// A configured instance of the offline engine
#[async_trait]
pub trait LocalTtsSession: Send + Sync {
    /// Speaking rate in words per minute
    fn set_rate(&mut self, rate: u32);

    /// Volume between 0.0 and 1.0
    fn set_volume(&mut self, volume: f32);

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String>;

    fn select_voice(&mut self, id: &str);

    /// Render text to a complete WAV file and return its bytes
    async fn synthesize_to_wav(&mut self, text: &str) -> Result<Vec<u8>, String>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    ConversionFailed(String),
}

/// Converts WAV audio to MP3
#[async_trait]
pub trait Transcoder: Send + Sync {
    fn is_available(&self) -> bool;

    async fn wav_to_mp3(&self, wav: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}
