/// Error kinds surfaced by the triage engine.
///
/// `InvalidInput` aborts the operation that received the bad value.
/// `DecodeFailure` and `AnalysisFailure` are scoped to a single image and
/// never abort a batch; the batch layer logs them and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to decode image '{name}'")]
    DecodeFailure {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("analysis failed for image '{name}': {reason}")]
    AnalysisFailure { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TriageError>;
