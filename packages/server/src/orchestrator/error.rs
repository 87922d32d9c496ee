use judge_client::JudgeClientError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Problem {0} not found or has no test cases")]
    ProblemNotFound(i32),

    #[error("Submission {0} not found")]
    SubmissionNotFound(Uuid),

    #[error("Unknown token '{0}'")]
    UnknownToken(String),

    #[error("Execution service unavailable: {0}")]
    ExecutionServiceUnavailable(String),

    #[error("Execution service rejected the submission: {0}")]
    ExecutionRejected(String),

    #[error("{0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),
}

impl OrchestratorError {
    /// Whether the caller may retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExecutionServiceUnavailable(_))
    }
}

impl From<JudgeClientError> for OrchestratorError {
    fn from(err: JudgeClientError) -> Self {
        match err {
            JudgeClientError::Rejected { status, body } => {
                Self::ExecutionRejected(format!("{status} - {body}"))
            }
            other => Self::ExecutionServiceUnavailable(other.to_string()),
        }
    }
}
