//! HTTP API for the depot service.
//!
//! Endpoints:
//! - `POST /upload/` — multipart file upload
//! - `GET /status/{document_id}` — document status lookup
//! - `GET /` — liveness/info

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::DepotService;

pub mod documents;
use documents::{document_status_handler, upload_document_handler};

/// Build the API router
pub fn router(service: Arc<DepotService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The body limit hard-caps what the multipart extractor will read; the
    // declared Content-Length checks in the upload handler run first
    let max_body_size = service.config.limits.max_upload_bytes as usize;

    Router::new()
        .route("/", get(root_handler))
        .route(
            "/upload/",
            post(upload_document_handler).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/status/{document_id}", get(document_status_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[derive(Serialize)]
struct InfoResponse {
    message: String,
}

async fn root_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Welcome to the Document Processing API".to_string(),
    })
}
