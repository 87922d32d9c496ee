use chrono::{DateTime, Utc};
use common::{Language, SubmissionStatus, Verdict};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{submission, test_case_result};
use crate::error::AppError;
use crate::orchestrator::{CreatedSubmission, ReconcileSummary};

/// A language given either as a Judge0 language id or as a slug.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum LanguageRef {
    /// Judge0 language id, passed through unchecked.
    #[schema(example = 71)]
    Id(i32),
    /// Language slug, e.g. "python" or "cpp". Numeric strings are ids.
    #[schema(example = "python")]
    Slug(String),
}

impl LanguageRef {
    /// Resolve to a Judge0 language id.
    pub fn judge_id(&self) -> Result<i32, AppError> {
        let id = match self {
            LanguageRef::Id(id) => Some(*id),
            LanguageRef::Slug(slug) => match slug.trim().parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => Language::from_slug(slug).map(|lang| lang.judge_id),
            },
        };

        match id {
            Some(id) if id > 0 => Ok(id),
            Some(id) => Err(AppError::Validation(format!(
                "Language id must be positive, got {}",
                id
            ))),
            None => Err(AppError::Validation(format!(
                "Unknown language {:?}",
                self
            ))),
        }
    }
}

/// Request body for creating a submission.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[schema(example = 1)]
    pub problem_id: i32,
    #[serde(alias = "language")]
    pub language_id: LanguageRef,
    /// Program source. At most `submission.max_source_bytes` bytes.
    #[serde(alias = "code")]
    #[schema(example = "print(int(input()) * 2)")]
    pub source_code: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionResponse {
    pub id: Uuid,
    pub status: SubmissionStatus,
    #[schema(example = 2)]
    pub test_case_count: usize,
}

impl From<CreatedSubmission> for CreateSubmissionResponse {
    fn from(created: CreatedSubmission) -> Self {
        Self {
            id: created.id,
            status: created.status,
            test_case_count: created.test_case_count,
        }
    }
}

/// Query parameters for polling a submission.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PollQuery {
    /// Run one bounded reconcile pass against the judge before answering.
    #[serde(default)]
    pub fresh: bool,
}

/// Per-test-case state, as seen by the submitter.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResultResponse {
    #[schema(example = 0)]
    pub ordinal: i32,
    pub verdict: Verdict,
    /// Wall time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i32>,
    /// Peak memory in kilobytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_output: Option<String>,
}

impl From<test_case_result::Model> for TestCaseResultResponse {
    fn from(row: test_case_result::Model) -> Self {
        Self {
            ordinal: row.ordinal,
            verdict: row.verdict,
            time: row.time_ms,
            memory: row.memory_kb,
            stdout: row.stdout,
            stderr: row.stderr,
            compile_output: row.compile_output,
        }
    }
}

/// Full submission state with per-test-case results in ordinal order.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    #[schema(example = 1)]
    pub problem_id: i32,
    #[schema(example = 71)]
    pub language_id: i32,
    pub status: SubmissionStatus,
    /// Maximum time across test cases, in milliseconds. Present once final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_time: Option<i32>,
    /// Maximum memory across test cases, in kilobytes. Present once final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_memory: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
    pub test_cases: Vec<TestCaseResultResponse>,
}

impl SubmissionResponse {
    pub fn from_parts(
        submission: submission::Model,
        results: Vec<test_case_result::Model>,
    ) -> Self {
        Self {
            id: submission.id,
            problem_id: submission.problem_id,
            language_id: submission.language_id,
            status: submission.status,
            aggregate_time: submission.aggregate_time_ms,
            aggregate_memory: submission.aggregate_memory_kb,
            created_at: submission.created_at,
            finalized_at: submission.finalized_at,
            test_cases: results.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub submission_id: Uuid,
    pub applied: usize,
    pub already_terminal: usize,
    pub still_running: usize,
    pub unrecognised: usize,
    /// Pending test cases no longer fetched because the judge kept not knowing them.
    pub exhausted: usize,
    pub status: SubmissionStatus,
}

impl From<ReconcileSummary> for ReconcileResponse {
    fn from(summary: ReconcileSummary) -> Self {
        Self {
            submission_id: summary.submission_id,
            applied: summary.applied,
            already_terminal: summary.already_terminal,
            still_running: summary.still_running,
            unrecognised: summary.unrecognised,
            exhausted: summary.exhausted,
            status: summary.status,
        }
    }
}
