// src/health.rs
//! Liveness probe: confirms the process is up and the database answers.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use crate::common::{now_timestamp, AppState};

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(Extension(state_lock): Extension<Arc<RwLock<AppState>>>) -> Response {
    let state = state_lock.read().await.clone();

    let (code, status, database) = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unreachable")
        }
    };

    (
        code,
        Json(HealthStatus {
            status,
            database,
            timestamp: now_timestamp(),
        }),
    )
        .into_response()
}

pub fn health_routes() -> Router {
    Router::new().route("/api/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::common::test_support::{json_request, send, test_pool, test_router};

    #[tokio::test]
    async fn test_health_reports_database() {
        let pool = test_pool().await;
        let router = test_router(pool.clone());

        let response = send(&router, json_request(Method::GET, "/api/health", None, None)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["status"], "healthy");
        assert_eq!(response.json()["database"], "connected");

        pool.close().await;
        let response = send(&router, json_request(Method::GET, "/api/health", None, None)).await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json()["status"], "unhealthy");
    }
}
