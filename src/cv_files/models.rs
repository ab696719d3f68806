// src/cv_files/models.rs

use bytes::Bytes;
use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone)]
pub struct CvFile {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub file_content: Vec<u8>,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: String,
}

/// An upload that passed every check and is ready to insert.
#[derive(Debug, Clone)]
pub struct NewCvFile {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub content: Bytes,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadCvResponse {
    pub success: bool,
    pub file_id: i64,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub mime_type: String,
}
