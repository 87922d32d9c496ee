use common::{SubmissionStatus, Verdict};
use judge_client::{JudgeReport, WireResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::orchestrator::RecordOutcome;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// Shared secret embedded in the callback URL given to the judge.
    pub secret: Option<String>,
}

/// Body the judge sends when a test case completes. Output fields are base64.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct CallbackPayload {
    #[schema(example = "d85cd024-1548-4165-96c7-7bc88673f194")]
    pub token: String,
    pub status: CallbackStatus,
    /// Seconds, as a string or number.
    #[schema(example = "0.01")]
    pub time: Option<String>,
    /// Kilobytes.
    #[schema(example = 1000)]
    pub memory: Option<i64>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
}

#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct CallbackStatus {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Accepted")]
    pub description: String,
}

/// Parse and validate a callback body. Nothing is touched on failure.
pub fn parse_callback(body: &[u8]) -> Result<JudgeReport, AppError> {
    let wire: WireResult = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedCallback(e.to_string()))?;
    JudgeReport::from_wire(wire).map_err(|e| AppError::MalformedCallback(e.to_string()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackOutcome {
    /// The verdict was recorded.
    Applied,
    /// The test case already had a verdict; nothing changed.
    Duplicate,
    /// The judge reported a queued or running state; nothing changed.
    StillRunning,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub token: String,
    pub submission_id: Uuid,
    pub outcome: CallbackOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    /// Submission status after this callback, when it carried a terminal verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
}

impl CallbackResponse {
    pub fn new(token: String, outcome: RecordOutcome) -> Self {
        let submission_id = outcome.submission_id();
        match outcome {
            RecordOutcome::Applied {
                verdict, finalize, ..
            } => Self {
                token,
                submission_id,
                outcome: CallbackOutcome::Applied,
                verdict: Some(verdict),
                submission_status: Some(finalize.status()),
            },
            RecordOutcome::AlreadyTerminal {
                verdict, finalize, ..
            } => Self {
                token,
                submission_id,
                outcome: CallbackOutcome::Duplicate,
                verdict: Some(verdict),
                submission_status: Some(finalize.status()),
            },
            RecordOutcome::StillRunning { .. } => Self {
                token,
                submission_id,
                outcome: CallbackOutcome::StillRunning,
                verdict: None,
                submission_status: None,
            },
        }
    }
}
