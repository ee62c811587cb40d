use super::staging_dir;
use super::tts_repository::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// ffmpeg implementation of the WAV -> MP3 transcoder
pub struct FfmpegTranscoder {
    binary: String,
    staging_root: Option<PathBuf>,
}

impl FfmpegTranscoder {
    pub fn new(binary: String, staging_root: Option<PathBuf>) -> Self {
        Self {
            binary,
            staging_root,
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    async fn wav_to_mp3(&self, wav: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let start_time = Instant::now();

        let staging = staging_dir(self.staging_root.as_deref()).map_err(|e| {
            TranscodeError::ConversionFailed(format!("failed to create staging directory: {}", e))
        })?;
        let wav_path = staging.path().join("in.wav");
        let mp3_path = staging.path().join("out.mp3");

        tokio::fs::write(&wav_path, wav).await.map_err(|e| {
            TranscodeError::ConversionFailed(format!("failed to stage WAV input: {}", e))
        })?;

        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(&wav_path)
            .args(["-vn", "-codec:a", "libmp3lame", "-q:a", "4"])
            .arg(&mp3_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TranscodeError::Unavailable(format!(
                    "{} not found. Install ffmpeg or set NEONVOX_FFMPEG_BIN",
                    self.binary
                )),
                _ => TranscodeError::ConversionFailed(format!("failed to start ffmpeg: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, stderr = %stderr.trim(), "ffmpeg failed");
            return Err(TranscodeError::ConversionFailed(stderr.trim().to_string()));
        }

        let mp3 = tokio::fs::read(&mp3_path).await.map_err(|e| {
            TranscodeError::ConversionFailed(format!("ffmpeg produced no output: {}", e))
        })?;

        tracing::debug!(
            wav_size = wav.len(),
            mp3_size = mp3.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "WAV transcoded to MP3"
        );

        Ok(mp3)
    }
}
