use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::batch::BatchEntry;
use super::error::TtsServiceError;
use super::item::mp3_name;

pub const MIME_MPEG: &str = "audio/mpeg";
pub const MIME_ZIP: &str = "application/zip";

pub const SINGLE_FILENAME: &str = "neonvox.mp3";
pub const BATCH_FILENAME: &str = "neonvox_batch.zip";

/// Synthesized audio. Output is always normalized to MP3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl AudioBlob {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: MIME_MPEG,
        }
    }
}

/// Final bytes handed to the caller, with the metadata needed to serve them
#[derive(Debug, Clone)]
pub struct DeliveryPayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

impl DeliveryPayload {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}

pub fn package_single(blob: AudioBlob) -> DeliveryPayload {
    DeliveryPayload {
        bytes: blob.bytes,
        content_type: blob.content_type,
        filename: SINGLE_FILENAME,
    }
}

/// Zip batch results, one deflated entry per item, in input order.
///
/// Items that map to the same entry name are written in order with the last
/// one winning; earlier duplicates are dropped rather than renamed, so the
/// archive can hold fewer entries than there were items.
pub fn package_batch(entries: &[BatchEntry]) -> Result<DeliveryPayload, TtsServiceError> {
    let names: Vec<String> = entries
        .iter()
        .map(|entry| mp3_name(entry.item.filename()))
        .collect();

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, name) in names.iter().enumerate() {
        last_index.insert(name.as_str(), index);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (index, (entry, name)) in entries.iter().zip(&names).enumerate() {
        if last_index.get(name.as_str()) != Some(&index) {
            tracing::warn!(entry = %name, "Duplicate archive entry overwritten by a later row");
            continue;
        }

        zip.start_file(name.as_str(), options)
            .map_err(|e| TtsServiceError::Other(anyhow::anyhow!("zip error: {}", e)))?;
        zip.write_all(&entry.audio.bytes)
            .map_err(|e| TtsServiceError::Other(anyhow::anyhow!("zip write error: {}", e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| TtsServiceError::Other(anyhow::anyhow!("zip finish error: {}", e)))?;

    Ok(DeliveryPayload {
        bytes: cursor.into_inner(),
        content_type: MIME_ZIP,
        filename: BATCH_FILENAME,
    })
}
