use serde::{Deserialize, Serialize};

use super::error::TtsServiceError;

pub const DEFAULT_LANGUAGE: &str = "en";

/// A voice offered by the local engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    /// Free-form label such as "male" or "female"; empty when the engine doesn't say
    pub gender: String,
}

/// A caller's hint for which local voice to use, e.g. "female" or part of a voice name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePreference(String);

impl VoicePreference {
    /// Blank preferences count as no preference at all
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, voice: &VoiceInfo) -> bool {
        voice.name.to_lowercase().contains(&self.0) || voice.gender.to_lowercase().contains(&self.0)
    }

    /// First voice, in enumeration order, whose name or gender contains the preference
    pub fn select<'a>(&self, voices: &'a [VoiceInfo]) -> Option<&'a VoiceInfo> {
        voices.iter().find(|v| self.matches(v))
    }
}

/// Pass-through settings for the synthesis backends, range-checked at the boundary
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    /// Cloud engine only
    pub language: String,
    /// Local engine only
    pub voice: Option<VoicePreference>,
    /// Local engine only, words per minute
    pub rate: Option<u32>,
    /// Local engine only, 0.0..=1.0
    pub volume: Option<f32>,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            voice: None,
            rate: None,
            volume: None,
        }
    }
}

impl VoiceParams {
    pub fn new(
        language: Option<&str>,
        voice: Option<&str>,
        rate: Option<i64>,
        volume: Option<f64>,
    ) -> Result<Self, TtsServiceError> {
        let language = match language.map(str::trim).filter(|s| !s.is_empty()) {
            None => DEFAULT_LANGUAGE.to_string(),
            Some(lang) => {
                if !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                    return Err(TtsServiceError::Validation(format!(
                        "invalid language code '{}'",
                        lang
                    )));
                }
                lang.to_string()
            }
        };

        let rate = match rate {
            None => None,
            Some(r) if r > 0 && r <= u32::MAX as i64 => Some(r as u32),
            Some(r) => {
                return Err(TtsServiceError::Validation(format!(
                    "rate must be a positive integer, got {}",
                    r
                )))
            }
        };

        let volume = match volume {
            None => None,
            Some(v) if (0.0..=1.0).contains(&v) => Some(v as f32),
            Some(v) => {
                return Err(TtsServiceError::Validation(format!(
                    "volume must be between 0.0 and 1.0, got {}",
                    v
                )))
            }
        };

        Ok(Self {
            language,
            voice: VoicePreference::parse(voice),
            rate,
            volume,
        })
    }
}
