// src/candidates/service.rs

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, warn};

use super::choices::{Choice, Framework};
use super::models::*;
use crate::common::error::{database_message, is_foreign_key_violation, is_unique_violation};
use crate::common::ApiError;

const SELECT_WITH_CV: &str = r#"
    SELECT c.*,
           f.filename AS cv_filename,
           f.original_name AS cv_original_name,
           f.file_size AS cv_file_size,
           f.mime_type AS cv_mime_type
    FROM candidate_responses c
    LEFT JOIN cv_files f ON f.id = c.cv_file_id
"#;

const DUPLICATE_APPLICATION: &str =
    "An application with this name and email combination already exists";

/// First instant of the UTC calendar month containing `now`, in stored timestamp form.
pub fn month_start(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-01T00:00:00.000Z").to_string()
}

pub struct CandidatesService {
    db: SqlitePool,
}

impl CandidatesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Submission
    // ============================================================================

    /// Inserts a normalized submission unless a live application with the same
    /// name and email already exists. Returns the new id and creation time.
    pub async fn submit(&self, candidate: &NewCandidate) -> Result<(i64, String), ApiError> {
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let existing: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM candidate_responses
            WHERE is_archived = 0
              AND lower(first_name) = lower(?)
              AND lower(last_name) = lower(?)
              AND lower(email) = lower(?)
              AND lower(coalesce(middle_name, '')) = lower(?)
            LIMIT 1
            "#,
        )
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(&candidate.email)
        .bind(candidate.middle_name.as_deref().unwrap_or(""))
        .fetch_optional(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(existing_id) = existing {
            warn!(existing_id = existing_id, "Duplicate application rejected");
            return Err(ApiError::Conflict(DUPLICATE_APPLICATION.to_string()));
        }

        let (id, created_at): (i64, String) = sqlx::query_as(
            r#"
            INSERT INTO candidate_responses (
                first_name, middle_name, last_name, email,
                location, main_framework, ui_structure, git_usage, design_tools,
                cv_file_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, created_at
            "#,
        )
        .bind(&candidate.first_name)
        .bind(&candidate.middle_name)
        .bind(&candidate.last_name)
        .bind(&candidate.email)
        .bind(candidate.location.as_str())
        .bind(candidate.main_framework.as_str())
        .bind(candidate.ui_structure.as_str())
        .bind(candidate.git_usage.as_str())
        .bind(candidate.design_tools.as_str())
        .bind(candidate.cv_file_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            candidate_id = id,
            location = candidate.location.as_str(),
            framework = candidate.main_framework.as_str(),
            has_cv = candidate.cv_file_id.is_some(),
            "Candidate application stored"
        );

        Ok((id, created_at))
    }

    // ============================================================================
    // Retrieval
    // ============================================================================

    pub async fn list(&self, filter: &CandidateListFilter) -> Result<Vec<CandidateWithCv>, ApiError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_WITH_CV);

        match filter.status {
            StatusFilter::Archived => {
                query.push(" WHERE c.is_archived = 1");
            }
            StatusFilter::All => {
                query.push(" WHERE c.is_archived = 0");
            }
            StatusFilter::Starred => {
                query.push(" WHERE c.is_archived = 0 AND c.is_starred = 1");
            }
            StatusFilter::Unread => {
                query.push(" WHERE c.is_archived = 0 AND c.is_read = 0");
            }
            StatusFilter::WithCv => {
                query.push(" WHERE c.is_archived = 0 AND c.cv_file_id IS NOT NULL");
            }
        }

        if let Some(search) = &filter.search {
            // SQLite's lower() only folds ASCII, so the needle must match it.
            let needle = search.to_ascii_lowercase();
            let columns = [
                "c.first_name",
                "coalesce(c.middle_name, '')",
                "c.last_name",
                "c.email",
                "c.location",
                "c.main_framework",
                "c.ui_structure",
                "c.git_usage",
                "c.design_tools",
            ];
            query.push(" AND (");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    query.push(" OR ");
                }
                query.push(format!("instr(lower({}), ", column));
                query.push_bind(needle.clone());
                query.push(") > 0");
            }
            query.push(")");
        }

        push_choice_filter(&mut query, filter.location);
        push_choice_filter(&mut query, filter.framework);
        push_choice_filter(&mut query, filter.ui_structure);
        push_choice_filter(&mut query, filter.git_usage);
        push_choice_filter(&mut query, filter.design_tools);

        match filter.cv {
            Some(CvFilter::Uploaded) => {
                query.push(" AND c.cv_file_id IS NOT NULL");
            }
            Some(CvFilter::Missing) => {
                query.push(" AND c.cv_file_id IS NULL");
            }
            None => {}
        }

        let order = filter.sort_order.as_sql();
        query.push(format!(
            " ORDER BY {} {}, c.id {}",
            filter.sort_by.column(),
            order,
            order
        ));

        query
            .build_query_as::<CandidateWithCv>()
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// Fetches one live candidate. Archived rows are reported as not found.
    pub async fn get(&self, id: i64) -> Result<CandidateWithCv, ApiError> {
        let sql = format!("{} WHERE c.id = ? AND c.is_archived = 0", SELECT_WITH_CV);
        sqlx::query_as::<_, CandidateWithCv>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Candidate not found".to_string()))
    }

    // ============================================================================
    // Status Transitions
    // ============================================================================

    pub async fn set_read(&self, id: i64, value: bool) -> Result<Candidate, ApiError> {
        self.set_flag(id, StatusAction::Read, value).await
    }

    pub async fn set_starred(&self, id: i64, value: bool) -> Result<Candidate, ApiError> {
        self.set_flag(id, StatusAction::Star, value).await
    }

    /// Archives or restores a candidate. Restoring fails with a conflict when a
    /// live application with the same identity was submitted in the meantime.
    pub async fn set_archived(&self, id: i64, value: bool) -> Result<Candidate, ApiError> {
        self.set_flag(id, StatusAction::Archive, value).await
    }

    pub async fn set_flag(&self, id: i64, action: StatusAction, value: bool) -> Result<Candidate, ApiError> {
        let sql = format!(
            "UPDATE candidate_responses SET {} = ? WHERE id = ? RETURNING *",
            action.column()
        );

        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(value)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict(DUPLICATE_APPLICATION.to_string())
                } else {
                    ApiError::DatabaseError(e)
                }
            })?
            .ok_or_else(|| ApiError::NotFound("Candidate not found".to_string()))?;

        info!(
            candidate_id = id,
            action = action.as_str(),
            value = value,
            "Candidate status updated"
        );

        Ok(candidate)
    }

    /// Permanently removes a candidate and returns the removed row. The CV it
    /// referenced stays in `cv_files`.
    pub async fn delete(&self, id: i64) -> Result<Candidate, ApiError> {
        let candidate = sqlx::query_as::<_, Candidate>(
            "DELETE FROM candidate_responses WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Candidate not found".to_string()))?;

        info!(candidate_id = id, "Candidate deleted");

        Ok(candidate)
    }

    // ============================================================================
    // Dashboard Aggregates
    // ============================================================================

    pub async fn stats(&self) -> Result<CandidateStats, ApiError> {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<CandidateStats, ApiError> {
        let mut stats = sqlx::query_as::<_, CandidateStats>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN is_archived = 0 THEN 1 ELSE 0 END), 0) AS total,
                COALESCE(SUM(CASE WHEN is_archived = 0 AND created_at >= ? THEN 1 ELSE 0 END), 0) AS this_month,
                COALESCE(SUM(CASE WHEN is_archived = 0 AND cv_file_id IS NOT NULL THEN 1 ELSE 0 END), 0) AS with_cv,
                COALESCE(SUM(CASE WHEN is_archived = 0 AND is_read = 0 THEN 1 ELSE 0 END), 0) AS unread,
                COALESCE(SUM(CASE WHEN is_archived = 0 AND is_starred = 1 THEN 1 ELSE 0 END), 0) AS starred,
                COALESCE(SUM(CASE WHEN is_archived = 1 THEN 1 ELSE 0 END), 0) AS archived
            FROM candidate_responses
            "#,
        )
        .bind(month_start(now))
        .fetch_one(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        stats.top_framework = sqlx::query_scalar::<_, Framework>(
            r#"
            SELECT main_framework FROM candidate_responses
            WHERE is_archived = 0
            GROUP BY main_framework
            ORDER BY COUNT(*) DESC, main_framework ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(stats)
    }
}

fn push_choice_filter<C: Choice>(query: &mut QueryBuilder<'_, Sqlite>, choice: Option<C>) {
    if let Some(choice) = choice {
        query.push(format!(" AND c.{} = ", C::COLUMN));
        query.push_bind(choice.as_str());
    }
}

fn map_insert_error(err: sqlx::Error) -> ApiError {
    if is_unique_violation(&err) {
        if database_message(&err).contains("candidate_responses.email") {
            warn!("Application rejected: email already used");
            ApiError::Conflict("An application with this email address already exists".to_string())
        } else {
            ApiError::Conflict(DUPLICATE_APPLICATION.to_string())
        }
    } else if is_foreign_key_violation(&err) {
        ApiError::ValidationError("cvFileId does not reference an uploaded CV".to_string())
    } else {
        ApiError::DatabaseError(err)
    }
}
