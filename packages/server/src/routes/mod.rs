use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/submission", post(handlers::submission::create_submission))
        .route("/submission/{id}", get(handlers::submission::get_submission))
        .route(
            "/submission/{id}/reconcile",
            post(handlers::submission::reconcile_submission),
        )
        .route(
            "/submission-callback",
            post(handlers::callback::submission_callback)
                .put(handlers::callback::submission_callback),
        )
        .route("/languages", get(handlers::meta::list_languages))
        .route("/health", get(handlers::meta::health))
}
