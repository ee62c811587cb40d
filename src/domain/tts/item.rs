use std::path::Path;

use super::error::TtsServiceError;

pub const DEFAULT_MAX_CHARS: usize = 2000;

const FILENAME_COLUMN: &str = "filename";
const TEXT_COLUMN: &str = "script_text";

/// One piece of text to synthesize, together with the name its audio is delivered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    filename: String,
    text: String,
}

impl TextItem {
    /// Build an item, trimming the text and reducing the filename to its base name.
    ///
    /// Length against the configured maximum is checked separately with
    /// [`TextItem::validate`], so that a whole batch can be checked up front.
    pub fn new(filename: &str, text: &str) -> Result<Self, TtsServiceError> {
        let filename = base_name(filename.trim());
        if filename.is_empty() {
            return Err(TtsServiceError::Validation(
                "filename is required".to_string(),
            ));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(TtsServiceError::Validation("text is required".to_string()));
        }

        Ok(Self {
            filename,
            text: text.to_string(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters, which is what the limit is expressed in
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn validate(&self, max_chars: usize) -> Result<(), TtsServiceError> {
        if self.char_count() > max_chars {
            return Err(TtsServiceError::Validation(format!(
                "text exceeds limit of {} characters",
                max_chars
            )));
        }
        Ok(())
    }
}

fn base_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Name of the archive entry for an item: the filename with its extension replaced by `.mp3`
pub fn mp3_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    format!("{}.mp3", stem)
}

/// Decode an uploaded CSV document into text items.
///
/// Rows lacking a filename or script text are skipped. Length limits and the
/// empty-batch check are left to the batch aggregator.
pub fn parse_csv_items(content: &[u8]) -> Result<Vec<TextItem>, TtsServiceError> {
    let text = std::str::from_utf8(content)
        .map_err(|_| TtsServiceError::Validation("CSV must be UTF-8 encoded".to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TtsServiceError::Validation(format!("malformed CSV: {}", e)))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let (filename_idx, text_idx) = match (column(FILENAME_COLUMN), column(TEXT_COLUMN)) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            tracing::debug!(headers = ?headers, "CSV lacks required columns");
            return Ok(Vec::new());
        }
    };

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record =
            record.map_err(|e| TtsServiceError::Validation(format!("malformed CSV: {}", e)))?;

        let filename = record.get(filename_idx).map(str::trim).unwrap_or_default();
        let script = record.get(text_idx).map(str::trim).unwrap_or_default();
        if filename.is_empty() || script.is_empty() {
            skipped += 1;
            continue;
        }

        items.push(TextItem::new(filename, script)?);
    }

    tracing::debug!(rows = items.len(), skipped, "CSV parsed");

    Ok(items)
}
