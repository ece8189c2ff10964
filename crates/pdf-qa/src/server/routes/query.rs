//! Query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryAnswer, QueryRequest};

/// POST /api/query - Ask a question about the uploaded document
pub async fn query_document(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryAnswer>> {
    let Json(request) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge {
                limit: state.config().server.max_json_body,
            };
        }
        Error::InvalidRequest(e.body_text())
    })?;

    tracing::info!("Query: \"{}\" on {}", request.query, request.filename);

    let answer = state.query_pipeline().query(&request).await?;
    Ok(Json(answer))
}
