// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Every failure a preparation run can hit, surfaced to the
// caller. There is no local recovery: any error aborts the run
// and the caller starts again from the raw dataset.
//
// The application and CLI layers wrap these in anyhow with
// extra context; inside the pipeline they stay typed so tests
// can match on the kind.

use thiserror::Error;

use crate::domain::stage::Stage;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required text column is absent from the input
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("embedding training failed: {0}")]
    EmbeddingTrainingFailure(String),

    /// Raw text handed to the single-text path was unusable
    #[error("invalid prediction input: {0}")]
    PredictionInputInvalid(String),

    #[error("stage '{requested}' requested but '{expected}' must run next")]
    StageOutOfOrder { expected: String, requested: Stage },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
