//! API routes

pub mod ingest;
pub mod query;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_upload_size: usize, max_json_body: usize) -> Router<AppState> {
    Router::new()
        // Upload - body limit slightly above the file ceiling; the handler enforces the exact size
        .route(
            "/upload",
            post(ingest::upload_document)
                .layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD)),
        )
        .route(
            "/query",
            post(query::query_document).layer(DefaultBodyLimit::max(max_json_body)),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "pdf-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Upload one PDF, then ask questions answered from its text",
        "limits": {
            "max_upload_bytes": config.storage.max_upload_size,
            "accepted_media_type": config.storage.accepted_media_type,
            "max_context_chars": config.query.max_context_chars,
        },
        "model": config.llm.model,
        "endpoints": {
            "POST /api/upload": "Upload a PDF (multipart field 'pdf'); replaces any previous document",
            "POST /api/query": "Ask a question: {query, filename}",
            "GET /api/info": "This description",
            "GET /health": "Liveness",
            "GET /ready": "Storage readiness"
        }
    }))
}
