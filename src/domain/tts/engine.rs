use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::TtsServiceError;

/// Synthesis engines the broker can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Online engine, produces MP3 directly
    Cloud,
    /// Offline engine, produces WAV that is transcoded to MP3
    Local,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Cloud => "cloud",
            Engine::Local => "local",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Engine {
    type Err = TtsServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // gtts / pyttsx3 are the names older clients still send
        match s.trim().to_lowercase().as_str() {
            "cloud" | "gtts" => Ok(Engine::Cloud),
            "local" | "pyttsx3" => Ok(Engine::Local),
            _ => Err(TtsServiceError::Validation(
                "engine must be 'cloud' or 'local'".to_string(),
            )),
        }
    }
}
