pub mod espeak_tts_repository;
pub mod ffmpeg_transcoder;
pub mod google_tts_repository;
pub mod tts_repository;

pub use espeak_tts_repository::EspeakTtsRepository;
pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use google_tts_repository::GoogleTtsRepository;
pub use tts_repository::{
    CloudTtsRepository, LocalTtsRepository, LocalTtsSession, TranscodeError, Transcoder,
};

use std::path::Path;
use tempfile::TempDir;

/// Scratch directory for a single synthesis call, removed when dropped
pub(crate) fn staging_dir(root: Option<&Path>) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("neonvox-");
    match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}
