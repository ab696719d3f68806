// src/cv_files/handlers.rs

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Extension, Multipart, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::UploadCvResponse;
use super::service::CvFilesService;
use super::storage::prepare_upload;
use crate::auth::AuthedAdmin;
use crate::common::helpers::attachment_disposition;
use crate::common::{parse_path_id, ApiError, AppState};

const CV_FIELD: &str = "cv";

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File size too large. Maximum size is 5MB.".to_string())
    } else {
        warn!(error = %err, "Malformed multipart upload");
        ApiError::BadRequest("Invalid file upload".to_string())
    }
}

/// POST /api/upload-cv - Upload a CV (public)
///
/// Expects a `multipart/form-data` body with the file in the `cv` field.
/// Nothing is stored unless every check passes.
pub async fn upload_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadCvResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(CV_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let declared_mime = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        let upload = prepare_upload(
            &original_name,
            declared_mime.as_deref(),
            data,
            Utc::now().timestamp_millis(),
        )
        .map_err(|e| {
            warn!(original_name = %original_name, error = %e, "CV upload rejected");
            e
        })?;

        let service = CvFilesService::new(state.db.clone());
        let file_id = service.store(&upload).await?;

        return Ok(Json(UploadCvResponse {
            success: true,
            file_id,
            size: upload.content.len() as i64,
            filename: upload.filename,
            original_name: upload.original_name,
            mime_type: upload.mime_type,
        }));
    }

    Err(ApiError::ValidationError("No file uploaded".to_string()))
}

/// GET /api/cv-files/:id - Download a stored CV (admin)
pub async fn download_cv(
    authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let id = parse_path_id(&id, "Invalid file ID")?;

    let service = CvFilesService::new(state.db.clone());
    let file = service.fetch(id).await?;

    info!(
        admin_id = %authed.profile.id,
        file_id = file.id,
        size = file.file_size,
        "CV downloaded"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.mime_type),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&file.original_name),
            ),
        ],
        file.file_content,
    ))
}
