//! Document upload endpoint

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{UploadResponse, UploadedFile};

/// Multipart field carrying the document
pub const UPLOAD_FIELD: &str = "pdf";

/// POST /api/upload - Replace the current document with a new one
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload is not multipart: {}", e.body_text());
        Error::MissingInput
    })?;
    let pipeline = state.ingest_pipeline();
    let limit = pipeline.max_upload_size();
    let mut upload = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        // Plain form fields other than the document are ignored
        if field.file_name().is_none() && field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let media_type = field.content_type().map(str::to_string);

        // Reject before reading the body
        pipeline.check_media_type(media_type.as_deref())?;

        let data = read_limited(&mut field, limit).await?;
        tracing::info!(
            "Received upload: {} ({} bytes)",
            filename.as_deref().unwrap_or("<unnamed>"),
            data.len()
        );

        upload = Some(UploadedFile {
            filename,
            media_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or(Error::MissingInput)?;
    let outcome = pipeline.ingest(upload).await?;

    Ok(Json(UploadResponse::from(&outcome)))
}

/// Read a field, aborting as soon as it grows past `limit` bytes
async fn read_limited(field: &mut Field<'_>, limit: usize) -> Result<Bytes> {
    let mut buf = BytesMut::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if buf.len() + chunk.len() > limit {
            tracing::warn!("Upload aborted after {} bytes (limit {})", buf.len() + chunk.len(), limit);
            return Err(Error::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}

fn multipart_error(err: MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // Whole request exceeded the body limit
        return Error::PayloadTooLarge { limit };
    }
    tracing::debug!("Malformed multipart request: {}", err.body_text());
    Error::MissingInput
}
