use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::ingest::Upload;
use crate::models::{AppState, ClassifyResponse};
use crate::types::{AppError, AppResult};

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/classify", post(classify_document))
        .with_state(state)
}

/// POST /api/v1/classify - upload and classify a .pdf or .txt document
async fn classify_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ClassifyResponse>> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    info!(
        filename = upload.filename.as_deref().unwrap_or("<unnamed>"),
        content_type = upload.content_type.as_deref().unwrap_or("<none>"),
        size = upload.bytes.len(),
        "Received classification request"
    );

    let outcome = state.classifier.classify_upload(upload).await.map_err(|e| {
        warn!(error = %e, kind = e.kind(), "Classification request failed");
        e
    })?;

    Ok(Json(outcome.into()))
}

async fn read_upload(multipart: &mut Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::InvalidRequest(format!(
        "multipart field `{}` is required",
        FILE_FIELD
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidRequest(e.body_text())
    }
}
