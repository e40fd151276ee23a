use thiserror::Error;

/// Everything the orchestrator can report to its caller. `Clone + PartialEq`
/// so a failure can live inside [`crate::workflow::WorkflowState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("no audio file selected")]
    NoFileSelected,
    #[error("selected audio file is empty")]
    EmptyFile,
    #[error("an analysis is already in progress")]
    SubmissionInFlight,
    #[error("prediction request failed: {0}")]
    PredictionRequestFailed(String),
    #[error("prediction response invalid: {0}")]
    PredictionResponseInvalid(String),
    #[error("recommendation request failed: {0}")]
    RecommendationRequestFailed(String),
    #[error("recommendation response invalid: {0}")]
    RecommendationResponseInvalid(String),
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
