// src/cv_files/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers;
use super::storage::MAX_CV_SIZE;

/// Multipart framing on top of the largest accepted file.
const UPLOAD_BODY_LIMIT: usize = MAX_CV_SIZE + 1024 * 1024;

pub fn cv_files_routes() -> Router {
    Router::new()
        .route(
            "/api/upload-cv",
            post(handlers::upload_cv).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/cv-files/:id", get(handlers::download_cv))
}
