// src/cv_files/service.rs

use sqlx::SqlitePool;
use tracing::info;

use super::models::{CvFile, NewCvFile};
use crate::common::ApiError;

pub struct CvFilesService {
    db: SqlitePool,
}

impl CvFilesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts a checked upload and returns its id.
    pub async fn store(&self, upload: &NewCvFile) -> Result<i64, ApiError> {
        let id = sqlx::query(
            r#"
            INSERT INTO cv_files (filename, original_name, file_content, file_size, mime_type)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&upload.filename)
        .bind(&upload.original_name)
        .bind(upload.content.as_ref())
        .bind(upload.content.len() as i64)
        .bind(&upload.mime_type)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .last_insert_rowid();

        info!(
            file_id = id,
            filename = %upload.filename,
            size = upload.content.len(),
            mime_type = %upload.mime_type,
            "CV stored"
        );

        Ok(id)
    }

    /// Loads a CV including its content.
    pub async fn fetch(&self, id: i64) -> Result<CvFile, ApiError> {
        sqlx::query_as::<_, CvFile>(
            r#"
            SELECT id, filename, original_name, file_content, file_size, mime_type, created_at
            FROM cv_files
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))
    }
}
