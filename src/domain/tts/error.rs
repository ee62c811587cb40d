use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("CSV appears empty or missing required columns: filename, script_text")]
    EmptyBatch,

    #[error("{0}")]
    PolicyDenied(String),

    #[error("{0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    TranscoderUnavailable(String),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("ffmpeg missing or conversion failed: {0}")]
    TranscodeFailed(String),

    #[error("synthesis timed out after {0}s")]
    SynthesisTimeout(u64),

    #[error("Row {index} ('{filename}'): {source}")]
    BatchAborted {
        index: usize,
        filename: String,
        #[source]
        source: Box<TtsServiceError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TtsServiceError {
    /// Wrap a per-item failure with the identity of the item that caused it
    pub fn aborted_at(index: usize, filename: &str, cause: TtsServiceError) -> Self {
        TtsServiceError::BatchAborted {
            index,
            filename: filename.to_string(),
            source: Box::new(cause),
        }
    }

    /// The failure that started it all, looking through batch aborts
    pub fn root_cause(&self) -> &TtsServiceError {
        match self {
            TtsServiceError::BatchAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        let message = err.to_string();
        match err.root_cause() {
            TtsServiceError::Validation(_) | TtsServiceError::EmptyBatch => {
                AppError::BadRequest(message)
            }
            TtsServiceError::PolicyDenied(_) => AppError::Forbidden(message),
            TtsServiceError::BackendUnavailable(_) | TtsServiceError::TranscoderUnavailable(_) => {
                AppError::ServiceUnavailable(message)
            }
            TtsServiceError::Synthesis(_) => AppError::ExternalService(message),
            TtsServiceError::SynthesisTimeout(_) => AppError::GatewayTimeout(message),
            TtsServiceError::TranscodeFailed(_)
            | TtsServiceError::Other(_)
            | TtsServiceError::BatchAborted { .. } => AppError::Internal(message),
        }
    }
}
