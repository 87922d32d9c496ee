use axum::Json;

use crate::models::language::{LanguageResponse, all_languages};

#[utoipa::path(
    get,
    path = "/languages",
    tag = "Meta",
    operation_id = "listLanguages",
    summary = "List known language slugs",
    description = "Slugs accepted in place of a numeric Judge0 language id when creating a submission.",
    responses(
        (status = 200, description = "Language table", body = Vec<LanguageResponse>),
    ),
)]
pub async fn list_languages() -> Json<Vec<LanguageResponse>> {
    Json(all_languages())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Meta",
    operation_id = "health",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Service is up", body = String),
    ),
)]
pub async fn health() -> &'static str {
    "OK"
}
