pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod routes;
pub mod state;
pub mod store;
pub mod sweeper;

use axum::Json;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Submission Relay API",
        version = "1.0.0",
        description = "Fans submissions out to Judge0, collects per-test-case results and aggregates the final verdict"
    ),
    paths(
        handlers::submission::create_submission,
        handlers::submission::get_submission,
        handlers::submission::reconcile_submission,
        handlers::callback::submission_callback,
        handlers::meta::list_languages,
        handlers::meta::health,
    ),
    tags(
        (name = "Submissions", description = "Submission creation and polling"),
        (name = "Callbacks", description = "Completion callbacks from the judge"),
        (name = "Meta", description = "Languages and liveness"),
    ),
)]
pub struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(config.max_age));

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    routes::routes()
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
