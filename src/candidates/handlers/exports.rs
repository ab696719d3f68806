// src/candidates/handlers/exports.rs

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::auth::AuthedAdmin;
use crate::candidates::choices::Choice;
use crate::candidates::models::{CandidateListFilter, CandidateWithCv, ExportFormat, ExportQuery};
use crate::candidates::service::CandidatesService;
use crate::candidates::validators::parse_export_format;
use crate::common::{ApiError, AppState};

const CSV_HEADER: &str = "ID,First Name,Middle Name,Last Name,Email,Location,Framework,UI Structure,Git Usage,Design Tools,CV File,Applied Date,Read,Starred,Archived";

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Renders candidates as CSV, one quoted record per line.
pub fn candidates_to_csv(rows: &[CandidateWithCv]) -> String {
    let mut csv_content = String::from(CSV_HEADER);
    csv_content.push('\n');

    for row in rows {
        let c = &row.candidate;
        let id = c.id.to_string();
        let fields = [
            id.as_str(),
            c.first_name.as_str(),
            c.middle_name.as_deref().unwrap_or(""),
            c.last_name.as_str(),
            c.email.as_str(),
            c.location.as_str(),
            c.main_framework.as_str(),
            c.ui_structure.as_str(),
            c.git_usage.as_str(),
            c.design_tools.as_str(),
            row.cv_original_name.as_deref().unwrap_or(""),
            c.created_at.as_str(),
            yes_no(c.is_read),
            yes_no(c.is_starred),
            yes_no(c.is_archived),
        ];
        let record: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        csv_content.push_str(&record.join(","));
        csv_content.push('\n');
    }

    csv_content
}

/// GET /api/candidates/export - Export candidates in CSV or JSON format
///
/// Accepts the same filters as the listing plus `format=csv|json`.
pub async fn export_candidates(
    authed: AuthedAdmin,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let format = parse_export_format(query.format.as_deref())?;
    let filter = CandidateListFilter::try_from(&query.filters)?;

    let service = CandidatesService::new(state.db.clone());
    let rows = service.list(&filter).await?;
    let record_count = rows.len();

    let (content_type, filename, body) = match format {
        ExportFormat::Csv => ("text/csv; charset=utf-8", "candidates_export.csv", candidates_to_csv(&rows)),
        ExportFormat::Json => {
            let json_content = serde_json::to_string_pretty(&rows).map_err(|e| {
                error!(error = %e, "Failed to serialize candidates for export");
                ApiError::InternalServer("Failed to serialize export".to_string())
            })?;
            ("application/json", "candidates_export.json", json_content)
        }
    };

    info!(
        admin_id = %authed.profile.id,
        record_count = record_count,
        format = ?format,
        "Candidates exported"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
