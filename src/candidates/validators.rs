// src/candidates/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::choices::{Choice, DesignTools, Framework, GitUsage, Location, UiStructure};
use super::models::*;
use crate::common::{ApiError, ValidationResult, Validator};

// ============================================================================
// Submission Validators
// ============================================================================

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Checks presence and shape of a submission. Token translation happens
/// afterwards in [`normalize_submission`].
pub struct SubmissionValidator;

impl Validator<CreateCandidateRequest> for SubmissionValidator {
    fn validate(&self, data: &CreateCandidateRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("firstName", data.first_name.as_deref(), "First name is required");
        result.require("lastName", data.last_name.as_deref(), "Last name is required");
        result.require("email", data.email.as_deref(), "Email is required");

        if let Some(email) = data.email.as_deref() {
            if !email.trim().is_empty() && !is_valid_email(email) {
                result.add_error("email", "Email must be a valid address");
            }
        }

        result.require(Location::FIELD, data.location.as_deref(), "Location is required");
        result.require(Framework::FIELD, data.framework.as_deref(), "Framework is required");
        result.require(
            UiStructure::FIELD,
            data.ui_structure.as_deref(),
            "UI structure is required",
        );
        result.require(GitUsage::FIELD, data.git_usage.as_deref(), "Git usage is required");
        result.require(
            DesignTools::FIELD,
            data.design_tools.as_deref(),
            "Design tools is required",
        );

        if let Some(id) = data.cv_file_id {
            if id <= 0 {
                result.add_error("cvFileId", "cvFileId must be a positive integer");
            }
        }

        result
    }
}

fn map_form_token<C: Choice>(token: Option<&str>) -> Result<C, ApiError> {
    let token = token.unwrap_or_default();
    C::from_form_token(token).ok_or_else(|| {
        ApiError::MappingError(format!("Unknown {} value: {}", C::FIELD, token.trim()))
    })
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Validates a submission and translates its answers to the stored vocabulary.
pub fn normalize_submission(data: &CreateCandidateRequest) -> Result<NewCandidate, ApiError> {
    let validation = SubmissionValidator.validate(data);
    if !validation.is_valid {
        return Err(validation.into());
    }

    Ok(NewCandidate {
        first_name: trimmed(data.first_name.as_deref()),
        middle_name: data
            .middle_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        last_name: trimmed(data.last_name.as_deref()),
        email: trimmed(data.email.as_deref()).to_lowercase(),
        location: map_form_token(data.location.as_deref())?,
        main_framework: map_form_token(data.framework.as_deref())?,
        ui_structure: map_form_token(data.ui_structure.as_deref())?,
        git_usage: map_form_token(data.git_usage.as_deref())?,
        design_tools: map_form_token(data.design_tools.as_deref())?,
        cv_file_id: data.cv_file_id,
    })
}

// ============================================================================
// Dashboard Filter Validators
// ============================================================================

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_canonical<C: Choice>(value: &Option<String>, param: &str) -> Result<Option<C>, ApiError> {
    match non_empty(value) {
        None => Ok(None),
        Some(token) => C::from_canonical(token).map(Some).ok_or_else(|| {
            ApiError::ValidationError(format!("Invalid {} filter: {}", param, token))
        }),
    }
}

impl TryFrom<&CandidateFilters> for CandidateListFilter {
    type Error = ApiError;

    fn try_from(query: &CandidateFilters) -> Result<Self, Self::Error> {
        let status = match non_empty(&query.status) {
            None | Some("all") => StatusFilter::All,
            Some("starred") => StatusFilter::Starred,
            Some("unread") => StatusFilter::Unread,
            Some("with_cv") => StatusFilter::WithCv,
            Some("archived") => StatusFilter::Archived,
            Some(other) => {
                return Err(ApiError::ValidationError(format!(
                    "Invalid status filter: {}",
                    other
                )))
            }
        };

        let cv = match non_empty(&query.cv) {
            None => None,
            Some("uploaded") => Some(CvFilter::Uploaded),
            Some("missing") => Some(CvFilter::Missing),
            Some(other) => {
                return Err(ApiError::ValidationError(format!("Invalid cv filter: {}", other)))
            }
        };

        let sort_by = match non_empty(&query.sort_by) {
            None | Some("created_at") => SortField::CreatedAt,
            Some("first_name") => SortField::FirstName,
            Some("last_name") => SortField::LastName,
            Some("email") => SortField::Email,
            Some("location") => SortField::Location,
            Some("main_framework") => SortField::MainFramework,
            Some(other) => {
                return Err(ApiError::ValidationError(format!("Invalid sort_by: {}", other)))
            }
        };

        let sort_order = match non_empty(&query.sort_order).map(str::to_lowercase).as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => {
                return Err(ApiError::ValidationError(format!("Invalid sort_order: {}", other)))
            }
        };

        Ok(CandidateListFilter {
            status,
            search: non_empty(&query.search).map(str::to_string),
            location: parse_canonical(&query.location, "location")?,
            framework: parse_canonical(&query.framework, "framework")?,
            ui_structure: parse_canonical(&query.ui_structure, "ui_structure")?,
            git_usage: parse_canonical(&query.git_usage, "git_usage")?,
            design_tools: parse_canonical(&query.design_tools, "design_tools")?,
            cv,
            sort_by,
            sort_order,
        })
    }
}

pub fn parse_export_format(format: Option<&str>) -> Result<ExportFormat, ApiError> {
    match format.map(str::trim).filter(|f| !f.is_empty()) {
        None | Some("csv") => Ok(ExportFormat::Csv),
        Some("json") => Ok(ExportFormat::Json),
        Some(other) => Err(ApiError::ValidationError(format!(
            "Unsupported export format: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateCandidateRequest {
        CreateCandidateRequest {
            first_name: Some(" Ama ".to_string()),
            middle_name: Some("   ".to_string()),
            last_name: Some("Mensah".to_string()),
            email: Some("ama@example.com".to_string()),
            location: Some("outside-accra".to_string()),
            framework: Some("both".to_string()),
            ui_structure: Some("large-sections".to_string()),
            git_usage: Some("collaborative".to_string()),
            design_tools: Some("prefer-coding".to_string()),
            cv_file_id: None,
        }
    }

    #[test]
    fn test_normalize_submission_maps_every_answer() {
        let candidate = normalize_submission(&request()).unwrap();
        assert_eq!(candidate.first_name, "Ama");
        assert_eq!(candidate.middle_name, None);
        assert_eq!(candidate.location, Location::OutsideGreaterAccra);
        assert_eq!(candidate.main_framework, Framework::ReactAndNextjs);
        assert_eq!(candidate.ui_structure, UiStructure::LargerSections);
        assert_eq!(candidate.git_usage, GitUsage::CollaborativeBranchesPrs);
        assert_eq!(candidate.design_tools, DesignTools::PreferCodingOnly);
    }

    #[test]
    fn test_missing_required_fields_are_validation_errors() {
        let data = CreateCandidateRequest {
            first_name: Some("".to_string()),
            email: None,
            ..request()
        };
        let result = SubmissionValidator.validate(&data);
        assert!(!result.is_valid);
        assert!(result.has_error_for("firstName"));
        assert!(result.has_error_for("email"));

        match normalize_submission(&data) {
            Err(ApiError::ValidationError(msg)) => assert!(msg.contains("First name is required")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_answer_is_validation_not_mapping() {
        let data = CreateCandidateRequest {
            git_usage: None,
            ..request()
        };
        assert!(matches!(
            normalize_submission(&data),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_answer_is_mapping_error() {
        let data = CreateCandidateRequest {
            framework: Some("angular".to_string()),
            ..request()
        };
        match normalize_submission(&data) {
            Err(ApiError::MappingError(msg)) => {
                assert_eq!(msg, "Unknown framework value: angular")
            }
            other => panic!("expected mapping error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ama@example.com"));
        assert!(!is_valid_email("ama@example"));
        assert!(!is_valid_email("ama example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_default_filter() {
        let filter = CandidateListFilter::try_from(&CandidateFilters::default()).unwrap();
        assert_eq!(filter, CandidateListFilter::default());
        assert_eq!(filter.sort_by, SortField::CreatedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_filter_parses_canonical_tokens_only() {
        let query = CandidateFilters {
            status: Some("with_cv".to_string()),
            framework: Some("react_and_nextjs".to_string()),
            sort_by: Some("last_name".to_string()),
            sort_order: Some("ASC".to_string()),
            ..Default::default()
        };
        let filter = CandidateListFilter::try_from(&query).unwrap();
        assert_eq!(filter.status, StatusFilter::WithCv);
        assert_eq!(filter.framework, Some(Framework::ReactAndNextjs));
        assert_eq!(filter.sort_by, SortField::LastName);
        assert_eq!(filter.sort_order, SortOrder::Asc);

        let ui_token = CandidateFilters {
            framework: Some("both".to_string()),
            ..Default::default()
        };
        assert!(CandidateListFilter::try_from(&ui_token).is_err());
    }

    #[test]
    fn test_filter_rejects_unknown_values() {
        for query in [
            CandidateFilters {
                status: Some("deleted".to_string()),
                ..Default::default()
            },
            CandidateFilters {
                sort_by: Some("password".to_string()),
                ..Default::default()
            },
            CandidateFilters {
                cv: Some("maybe".to_string()),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                CandidateListFilter::try_from(&query),
                Err(ApiError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_export_format() {
        assert_eq!(parse_export_format(None).unwrap(), ExportFormat::Csv);
        assert_eq!(parse_export_format(Some("json")).unwrap(), ExportFormat::Json);
        assert!(parse_export_format(Some("xlsx")).is_err());
    }
}
