use super::tts_repository::CloudTtsRepository;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// The translate TTS endpoint rejects requests above 100 characters
const MAX_CHUNK_CHARS: usize = 100;

static CHUNK_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?;:,]+\s+").expect("chunk boundary pattern is valid"));

/// Google Translate TTS implementation of the cloud engine
pub struct GoogleTtsRepository {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTtsRepository {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Call the endpoint for a single chunk
    async fn call_google(
        &self,
        chunk: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, String> {
        let url = format!("{}/translate_tts", self.base_url);

        tracing::debug!(
            language,
            chunk_index = index,
            chunk_count = total,
            chunk_length = chunk.chars().count(),
            "Calling Google TTS"
        );

        let response = self
            .client
            .get(&url)
            .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", language), ("q", chunk)])
            .query(&[
                ("total", total.to_string()),
                ("idx", index.to_string()),
                ("textlen", chunk.chars().count().to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, language, "Google TTS request failed");
                format!("Google TTS request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, language, "Google TTS returned an error status");
            return Err(format!(
                "Google TTS returned {} (unsupported language '{}'?)",
                status, language
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read audio stream: {}", e))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CloudTtsRepository for GoogleTtsRepository {
    fn is_available(&self) -> bool {
        reqwest::Url::parse(&self.base_url).is_ok()
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let chunks = split_into_chunks(text);
        tracing::info!(
            chunk_count = chunks.len(),
            text_length = text.chars().count(),
            "Text split into chunks"
        );

        // MP3 frames are self-delimiting, so chunk audio can simply be appended
        let mut merged_audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let audio = self.call_google(chunk, language, index, chunks.len()).await?;
            merged_audio.extend(audio);
        }

        Ok(merged_audio)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Break text into pieces that each fit in one chunk: clauses first, then
/// words, then raw characters for words longer than a chunk.
fn segments(text: &str) -> Vec<String> {
    fn push_segment(segments: &mut Vec<String>, segment: &str) {
        if char_len(segment) <= MAX_CHUNK_CHARS {
            segments.push(segment.to_string());
            return;
        }
        for word in segment.split_inclusive(char::is_whitespace) {
            if char_len(word) <= MAX_CHUNK_CHARS {
                segments.push(word.to_string());
            } else {
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(MAX_CHUNK_CHARS) {
                    segments.push(piece.iter().collect());
                }
            }
        }
    }

    let mut segments = Vec::new();
    let mut last_end = 0;
    for mat in CHUNK_BOUNDARY.find_iter(text) {
        push_segment(&mut segments, &text[last_end..mat.end()]);
        last_end = mat.end();
    }
    if last_end < text.len() {
        push_segment(&mut segments, &text[last_end..]);
    }
    segments
}

/// Split text into chunks of at most MAX_CHUNK_CHARS characters, preferring
/// clause and word boundaries
fn split_into_chunks(text: &str) -> Vec<String> {
    let text = text.trim();
    if char_len(text) <= MAX_CHUNK_CHARS {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for segment in segments(text) {
        if !current.is_empty() && char_len(&current) + char_len(&segment) > MAX_CHUNK_CHARS {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            current.clear();
        }
        current.push_str(&segment);
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }

    chunks
}
