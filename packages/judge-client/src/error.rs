use thiserror::Error;

#[derive(Debug, Error)]
pub enum JudgeClientError {
    /// Network failure, timeout or 5xx. Safe to retry.
    #[error("Judge service unavailable: {0}")]
    Unavailable(String),

    /// The judge refused the request (4xx, or a per-entry batch error).
    #[error("Judge rejected request: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// The judge answered 2xx with a body that breaks the API contract.
    #[error("Invalid judge response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl JudgeClientError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<reqwest::Error> for JudgeClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            JudgeClientError::InvalidResponse(err.to_string())
        } else {
            JudgeClientError::Unavailable(err.to_string())
        }
    }
}

/// Why a judge result payload could not be turned into a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("token must not be empty")]
    EmptyToken,
    #[error("status is missing")]
    MissingStatus,
    #[error("status id {0} is not a valid judge status")]
    InvalidStatusId(i32),
    #[error("time '{0}' is not a non-negative number of seconds")]
    InvalidTime(String),
    #[error("memory {0} is not a valid kilobyte count")]
    InvalidMemory(i64),
    #[error("field '{0}' is not valid base64")]
    InvalidBase64(&'static str),
}
