// src/candidates/handlers/submissions.rs

use axum::extract::{rejection::JsonRejection, Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::candidates::models::{CreateCandidateRequest, CreateCandidateResponse};
use crate::candidates::service::CandidatesService;
use crate::candidates::validators::normalize_submission;
use crate::common::{safe_email_log, ApiError, AppState};

/// POST /api/candidates
/// Public questionnaire submission
///
/// Answers arrive as questionnaire tokens (`greater-accra`) and are stored as
/// canonical tokens (`greater_accra`). Nothing is written when validation,
/// mapping or the duplicate check fails.
pub async fn create_candidate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    payload: Result<Json<CreateCandidateRequest>, JsonRejection>,
) -> Result<Json<CreateCandidateResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "Rejected malformed application body");
        ApiError::BadRequest(e.body_text())
    })?;

    let candidate = normalize_submission(&payload)?;

    info!(
        email = %safe_email_log(&candidate.email),
        "Processing candidate application"
    );

    let service = CandidatesService::new(state.db.clone());
    let (id, created_at) = service.submit(&candidate).await?;

    Ok(Json(CreateCandidateResponse {
        success: true,
        id,
        created_at,
        message: "Application submitted successfully".to_string(),
    }))
}
