use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::{IsolationLevel, TransactionTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::orchestrator::OrchestratorError;
use crate::state::AppState;
use crate::store::SubmissionStore;

#[utoipa::path(
    post,
    path = "/submission",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution to a problem",
    description = "Dispatches one execution per test case of the problem and returns immediately. The submission starts `PENDING`; results arrive through callbacks or polling. Transient judge failures are retried with backoff before answering 503.",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission created", body = CreateSubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Judge rejected the submission (EXECUTION_REJECTED)", body = ErrorBody),
        (status = 503, description = "Judge or store unavailable (EXECUTION_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(problem_id = payload.problem_id))]
pub async fn create_submission(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let language_id = payload.language_id.judge_id()?;

    let created = state
        .config
        .dispatch_retry
        .run(
            "dispatch_submission",
            OrchestratorError::is_retryable,
            || {
                state
                    .orchestrator
                    .create_submission(payload.problem_id, language_id, &payload.source_code)
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse::from(created)),
    ))
}

#[utoipa::path(
    get,
    path = "/submission/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get submission state",
    description = "Returns the aggregate status and per-test-case results in ordinal order. With `fresh=true` and a `PENDING` submission, one bounded reconcile pass against the judge runs first; on timeout or judge failure the last known state is returned.",
    params(
        ("id" = Uuid, Path, description = "Submission ID"),
        PollQuery,
    ),
    responses(
        (status = 200, description = "Submission state", body = SubmissionResponse),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(submission_id = %id, fresh = query.fresh))]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PollQuery>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = SubmissionStore::new(&state.db)
        .find_submission(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))?;

    if query.fresh && !submission.status.is_terminal() {
        let timeout = Duration::from_millis(state.orchestrator.config().reconcile_timeout_ms);
        match tokio::time::timeout(timeout, state.orchestrator.reconcile(id)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Reconcile failed, returning last known state");
            }
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Reconcile timed out, returning last known state"
                );
            }
        }
    }

    // Aggregate status and per-test-case rows come from one snapshot.
    let txn = state
        .db
        .begin_with_config(Some(IsolationLevel::RepeatableRead), None)
        .await?;
    let store = SubmissionStore::new(&txn);
    let submission = store
        .find_submission(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))?;
    let results = store.results_for(id).await?;
    txn.commit().await?;

    Ok(Json(SubmissionResponse::from_parts(submission, results)))
}

#[utoipa::path(
    post,
    path = "/submission/{id}/reconcile",
    tag = "Submissions",
    operation_id = "reconcileSubmission",
    summary = "Pull pending results from the judge",
    description = "Fetches the judge-side state of every pending test case, records terminal results and finalizes the submission when possible. Safe to call repeatedly.",
    params(
        ("id" = Uuid, Path, description = "Submission ID"),
    ),
    responses(
        (status = 200, description = "Reconcile summary", body = ReconcileResponse),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Judge or store unavailable (EXECUTION_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(submission_id = %id))]
pub async fn reconcile_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let summary = state.orchestrator.reconcile(id).await?;

    info!(status = %summary.status, applied = summary.applied, "Manual reconcile");

    Ok(Json(summary.into()))
}
