use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::models::callback::*;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/submission-callback",
    tag = "Callbacks",
    operation_id = "submissionCallback",
    summary = "Receive a test case completion from the judge",
    description = "Called by the judge when one test case finishes. Duplicate and out-of-order deliveries are tolerated; a token that already has a verdict is left unchanged. Also accepted as POST.",
    params(CallbackQuery),
    request_body = CallbackPayload,
    responses(
        (status = 200, description = "Callback processed", body = CallbackResponse),
        (status = 400, description = "Malformed payload (MALFORMED_CALLBACK)", body = ErrorBody),
        (status = 403, description = "Secret missing or wrong (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Token not known (UNKNOWN_TOKEN)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query, body), fields(body_bytes = body.len()))]
pub async fn submission_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    body: Bytes,
) -> Result<Json<CallbackResponse>, AppError> {
    if let Some(expected) = state.config.callback.secret.as_deref()
        && query.secret.as_deref() != Some(expected)
    {
        return Err(AppError::Forbidden);
    }

    let report = parse_callback(&body)?;
    let token = report.token.clone();
    let outcome = state.orchestrator.record_result(&report).await?;

    info!(
        token = %token,
        submission_id = %outcome.submission_id(),
        status_id = report.status_id,
        "Callback processed"
    );

    Ok(Json(CallbackResponse::new(token, outcome)))
}
