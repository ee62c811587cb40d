use super::dispatcher::Synthesizer;
use super::error::TtsServiceError;
use super::item::TextItem;
use super::packager::AudioBlob;

/// One successfully synthesized item of a batch
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub item: TextItem,
    pub audio: AudioBlob,
}

/// Progress notification, emitted right before an item is synthesized
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// 1-based position of the item
    pub index: usize,
    pub total: usize,
    pub item: &'a TextItem,
}

/// Check every item against the length limit, reporting the first offender
pub fn validate_batch(items: &[TextItem], max_chars: usize) -> Result<(), TtsServiceError> {
    if items.is_empty() {
        return Err(TtsServiceError::EmptyBatch);
    }

    for (index, item) in items.iter().enumerate() {
        if item.char_count() > max_chars {
            return Err(TtsServiceError::Validation(format!(
                "Row '{}' (#{}): text exceeds {} chars",
                item.filename(),
                index + 1,
                max_chars
            )));
        }
    }

    Ok(())
}

pub async fn run_batch(
    items: Vec<TextItem>,
    synthesizer: &Synthesizer,
    max_chars: usize,
) -> Result<Vec<BatchEntry>, TtsServiceError> {
    run_batch_observed(items, synthesizer, max_chars, |_| {}).await
}

/// Synthesize items one after another, in input order.
///
/// The whole batch is validated before the first synthesis call. The first
/// failing item aborts the batch; items after it are never attempted.
pub async fn run_batch_observed<F>(
    items: Vec<TextItem>,
    synthesizer: &Synthesizer,
    max_chars: usize,
    mut on_progress: F,
) -> Result<Vec<BatchEntry>, TtsServiceError>
where
    F: FnMut(BatchProgress<'_>) + Send,
{
    validate_batch(&items, max_chars)?;

    let total = items.len();
    let mut entries = Vec::with_capacity(total);

    for (position, item) in items.into_iter().enumerate() {
        let index = position + 1;
        on_progress(BatchProgress {
            index,
            total,
            item: &item,
        });

        tracing::info!(
            engine = %synthesizer.engine(),
            index,
            total,
            filename = %item.filename(),
            text_length = item.char_count(),
            "Synthesizing batch item"
        );

        match synthesizer.synthesize(item.text()).await {
            Ok(audio) => entries.push(BatchEntry { item, audio }),
            Err(e) => {
                tracing::error!(
                    index,
                    filename = %item.filename(),
                    error = %e,
                    "Batch aborted"
                );
                return Err(TtsServiceError::aborted_at(index, item.filename(), e));
            }
        }
    }

    Ok(entries)
}
