// src/candidates/handlers/review.rs

use axum::extract::{rejection::JsonRejection, Extension, Json, Path, Query};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::AuthedAdmin;
use crate::candidates::models::*;
use crate::candidates::service::CandidatesService;
use crate::common::{parse_path_id, ApiError, AppState};

const INVALID_CANDIDATE_ID: &str = "Invalid candidate ID";

/// GET /api/candidates
/// Dashboard listing with optional status, search, answer and CV filters
pub async fn list_candidates(
    authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<CandidateFilters>,
) -> Result<Json<CandidateListResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let filter = CandidateListFilter::try_from(&query)?;

    let service = CandidatesService::new(state.db.clone());
    let candidates = service.list(&filter).await?;

    debug!(
        admin_id = %authed.profile.id,
        count = candidates.len(),
        status = ?filter.status,
        "Listed candidates"
    );

    Ok(Json(CandidateListResponse {
        success: true,
        candidates,
    }))
}

/// GET /api/candidates/:id
pub async fn get_candidate(
    _authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<CandidateWithCv>, ApiError> {
    let state = state_lock.read().await.clone();
    let id = parse_path_id(&id, INVALID_CANDIDATE_ID)?;

    let service = CandidatesService::new(state.db.clone());
    let candidate = service.get(id).await?;

    Ok(Json(candidate))
}

/// PUT /api/candidates/:id
/// Sets one of the read, star or archive flags
///
/// # Request Body
/// ```json
/// { "action": "star", "value": true }
/// ```
pub async fn update_candidate_status(
    authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let id = parse_path_id(&id, INVALID_CANDIDATE_ID)?;

    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let action = payload
        .action
        .as_deref()
        .and_then(StatusAction::parse)
        .ok_or_else(|| {
            ApiError::ValidationError(
                "Invalid action. Must be 'read', 'star', or 'archive'".to_string(),
            )
        })?;

    let value = payload
        .value
        .as_ref()
        .and_then(|v| v.as_bool())
        .ok_or_else(|| ApiError::ValidationError("Value must be a boolean".to_string()))?;

    let service = CandidatesService::new(state.db.clone());
    let candidate = match action {
        StatusAction::Read => service.set_read(id, value).await?,
        StatusAction::Star => service.set_starred(id, value).await?,
        StatusAction::Archive => service.set_archived(id, value).await?,
    };

    info!(
        admin_id = %authed.profile.id,
        candidate_id = id,
        action = action.as_str(),
        value = value,
        "Candidate flag changed by admin"
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        candidate,
        message: format!("Candidate {} status updated successfully", action.as_str()),
    }))
}

/// DELETE /api/candidates/:id
/// Permanently removes the candidate; the uploaded CV is kept
pub async fn delete_candidate(
    authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCandidateResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let id = parse_path_id(&id, INVALID_CANDIDATE_ID)?;

    let service = CandidatesService::new(state.db.clone());
    let deleted_candidate = service.delete(id).await?;

    info!(
        admin_id = %authed.profile.id,
        candidate_id = id,
        "Candidate deleted by admin"
    );

    Ok(Json(DeleteCandidateResponse {
        success: true,
        message: "Candidate deleted successfully".to_string(),
        deleted_candidate,
    }))
}

/// GET /api/candidates/stats
pub async fn candidate_stats(
    _authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<CandidateStatsResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let service = CandidatesService::new(state.db.clone());
    let stats = service.stats().await?;

    Ok(Json(CandidateStatsResponse {
        success: true,
        stats,
    }))
}
