use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::orchestrator::OrchestratorError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `MALFORMED_CALLBACK`, `FORBIDDEN`, `NOT_FOUND`, `UNKNOWN_TOKEN`,
    /// `EXECUTION_REJECTED`, `EXECUTION_UNAVAILABLE`, `STORE_UNAVAILABLE`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Source code must not be empty")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    MalformedCallback(String),
    Forbidden,
    NotFound(String),
    UnknownToken(String),
    ExecutionRejected(String),
    ExecutionUnavailable(String),
    StoreUnavailable(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::MalformedCallback(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "MALFORMED_CALLBACK",
                    message: msg,
                },
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "FORBIDDEN",
                    message: "Callback secret missing or invalid".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::UnknownToken(token) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "UNKNOWN_TOKEN",
                    message: format!("No test case with token '{}'", token),
                },
            ),
            AppError::ExecutionRejected(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    code: "EXECUTION_REJECTED",
                    message: msg,
                },
            ),
            AppError::ExecutionUnavailable(detail) => {
                tracing::warn!("Execution service unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "EXECUTION_UNAVAILABLE",
                        message: "The execution service is unavailable, try again later".into(),
                    },
                )
            }
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Store error: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "STORE_UNAVAILABLE",
                        message: "The submission store is unavailable, try again later".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::ProblemNotFound(_) | OrchestratorError::SubmissionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            OrchestratorError::UnknownToken(token) => AppError::UnknownToken(token),
            OrchestratorError::ExecutionServiceUnavailable(detail) => {
                AppError::ExecutionUnavailable(detail)
            }
            OrchestratorError::ExecutionRejected(detail) => AppError::ExecutionRejected(detail),
            OrchestratorError::Validation(msg) => AppError::Validation(msg),
            OrchestratorError::StoreUnavailable(e) => AppError::StoreUnavailable(e.to_string()),
        }
    }
}
