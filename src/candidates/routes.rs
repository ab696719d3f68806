// src/candidates/routes.rs

use crate::candidates::handlers;
use axum::{routing::get, Router};

pub fn candidates_routes() -> Router {
    Router::new()
        // Public submission; listing requires an admin
        .route(
            "/api/candidates",
            get(handlers::list_candidates).post(handlers::create_candidate),
        )
        // Dashboard routes
        .route("/api/candidates/stats", get(handlers::candidate_stats))
        .route("/api/candidates/export", get(handlers::export_candidates))
        .route(
            "/api/candidates/:id",
            get(handlers::get_candidate)
                .put(handlers::update_candidate_status)
                .delete(handlers::delete_candidate),
        )
}
