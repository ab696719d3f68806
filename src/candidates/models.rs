// src/candidates/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::{DesignTools, Framework, GitUsage, Location, UiStructure};

// ============================================================================
// Database Models
// ============================================================================

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub location: Location,
    pub main_framework: Framework,
    pub ui_structure: UiStructure,
    pub git_usage: GitUsage,
    pub design_tools: DesignTools,
    pub cv_file_id: Option<i64>,
    pub created_at: String,
    pub is_read: bool,
    pub is_starred: bool,
    pub is_archived: bool,
}

/// Candidate row joined with the metadata of its CV, if any.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct CandidateWithCv {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub candidate: Candidate,
    pub cv_filename: Option<String>,
    pub cv_original_name: Option<String>,
    pub cv_file_size: Option<i64>,
    pub cv_mime_type: Option<String>,
}

/// A validated, normalized submission ready to insert.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub location: Location,
    pub main_framework: Framework,
    pub ui_structure: UiStructure,
    pub git_usage: GitUsage,
    pub design_tools: DesignTools,
    pub cv_file_id: Option<i64>,
}

#[derive(FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct CandidateStats {
    pub total: i64,
    pub this_month: i64,
    pub with_cv: i64,
    pub unread: i64,
    pub starred: i64,
    pub archived: i64,
    #[sqlx(skip)]
    pub top_framework: Option<Framework>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Questionnaire submission as posted by the careers page.
///
/// Fields are optional here so that a missing answer is reported through
/// validation rather than as a deserialization failure.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub framework: Option<String>,
    pub ui_structure: Option<String>,
    pub git_usage: Option<String>,
    pub design_tools: Option<String>,
    pub cv_file_id: Option<i64>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateResponse {
    pub success: bool,
    pub id: i64,
    pub created_at: String,
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusRequest {
    pub action: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Read,
    Star,
    Archive,
}

impl StatusAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "read" => Some(StatusAction::Read),
            "star" => Some(StatusAction::Star),
            "archive" => Some(StatusAction::Archive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusAction::Read => "read",
            StatusAction::Star => "star",
            StatusAction::Archive => "archive",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            StatusAction::Read => "is_read",
            StatusAction::Star => "is_starred",
            StatusAction::Archive => "is_archived",
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub candidate: Candidate,
    pub message: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCandidateResponse {
    pub success: bool,
    pub message: String,
    pub deleted_candidate: Candidate,
}

#[derive(Serialize, Debug)]
pub struct CandidateListResponse {
    pub success: bool,
    pub candidates: Vec<CandidateWithCv>,
}

#[derive(Serialize, Debug)]
pub struct CandidateStatsResponse {
    pub success: bool,
    pub stats: CandidateStats,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Raw dashboard query string, validated into a [`CandidateListFilter`].
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CandidateFilters {
    pub status: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub framework: Option<String>,
    pub ui_structure: Option<String>,
    pub git_usage: Option<String>,
    pub design_tools: Option<String>,
    pub cv: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ExportQuery {
    pub format: Option<String>,
    #[serde(flatten)]
    pub filters: CandidateFilters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Starred,
    Unread,
    WithCv,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFilter {
    Uploaded,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    FirstName,
    LastName,
    Email,
    Location,
    MainFramework,
}

impl SortField {
    /// ORDER BY expression for this field
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "c.created_at",
            SortField::FirstName => "c.first_name COLLATE NOCASE",
            SortField::LastName => "c.last_name COLLATE NOCASE",
            SortField::Email => "c.email COLLATE NOCASE",
            SortField::Location => "c.location",
            SortField::MainFramework => "c.main_framework",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Typed list filter. The default lists every live candidate, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateListFilter {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub location: Option<Location>,
    pub framework: Option<Framework>,
    pub ui_structure: Option<UiStructure>,
    pub git_usage: Option<GitUsage>,
    pub design_tools: Option<DesignTools>,
    pub cv: Option<CvFilter>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}
