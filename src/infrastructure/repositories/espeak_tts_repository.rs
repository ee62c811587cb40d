use super::staging_dir;
use super::tts_repository::{LocalTtsRepository, LocalTtsSession};
use crate::domain::tts::VoiceInfo;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// espeak-ng implementation of the local engine
pub struct EspeakTtsRepository {
    binary: String,
    staging_root: Option<PathBuf>,
}

impl EspeakTtsRepository {
    pub fn new(binary: String, staging_root: Option<PathBuf>) -> Self {
        Self {
            binary,
            staging_root,
        }
    }
}

#[async_trait]
impl LocalTtsRepository for EspeakTtsRepository {
    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    async fn open_session(&self) -> Result<Box<dyn LocalTtsSession>, String> {
        Ok(Box::new(EspeakSession {
            binary: self.binary.clone(),
            staging_root: self.staging_root.clone(),
            rate: None,
            amplitude: None,
            voice: None,
        }))
    }
}

pub struct EspeakSession {
    binary: String,
    staging_root: Option<PathBuf>,
    rate: Option<u32>,
    amplitude: Option<u32>,
    voice: Option<String>,
}

impl EspeakSession {
    fn not_found(&self) -> String {
        format!(
            "{} not found. Install espeak-ng or set NEONVOX_ESPEAK_BIN",
            self.binary
        )
    }
}

#[async_trait]
impl LocalTtsSession for EspeakSession {
    fn set_rate(&mut self, rate: u32) {
        self.rate = Some(rate);
    }

    fn set_volume(&mut self, volume: f32) {
        // espeak amplitude: 100 is the default loudness
        self.amplitude = Some((volume.clamp(0.0, 1.0) * 100.0).round() as u32);
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String> {
        let output = Command::new(&self.binary)
            .arg("--voices")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => self.not_found(),
                _ => format!("failed to list espeak voices: {}", e),
            })?;

        if !output.status.success() {
            return Err(format!(
                "espeak --voices failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn select_voice(&mut self, id: &str) {
        self.voice = Some(id.to_string());
    }

    async fn synthesize_to_wav(&mut self, text: &str) -> Result<Vec<u8>, String> {
        let staging = staging_dir(self.staging_root.as_deref())
            .map_err(|e| format!("failed to create staging directory: {}", e))?;
        let wav_path = staging.path().join("out.wav");

        let mut command = Command::new(&self.binary);
        command.arg("-w").arg(&wav_path);
        if let Some(rate) = self.rate {
            command.arg("-s").arg(rate.to_string());
        }
        if let Some(amplitude) = self.amplitude {
            command.arg("-a").arg(amplitude.to_string());
        }
        if let Some(voice) = &self.voice {
            command.arg("-v").arg(voice);
        }

        // Text goes through stdin so it can never be read as a flag
        let mut child = command
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => self.not_found(),
                _ => format!("failed to start espeak: {}", e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| format!("failed to send text to espeak: {}", e))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("espeak did not finish: {}", e))?;

        if !output.status.success() {
            return Err(format!(
                "espeak error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let wav = tokio::fs::read(&wav_path)
            .await
            .map_err(|e| format!("espeak produced no audio: {}", e))?;

        tracing::debug!(
            wav_size = wav.len(),
            voice = ?self.voice,
            rate = ?self.rate,
            amplitude = ?self.amplitude,
            "espeak rendered WAV"
        );

        Ok(wav)
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
/// ```
fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            let gender = match fields[2].rsplit('/').next() {
                Some("M") => "male",
                Some("F") => "female",
                _ => "",
            };
            Some(VoiceInfo {
                id: fields[1].to_string(),
                name: fields[3].replace('_', " "),
                gender: gender.to_string(),
            })
        })
        .collect()
}
