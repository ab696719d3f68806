// src/cv_files/storage.rs
//! Upload checks: extension and MIME allow-lists, size ceiling, magic-byte
//! sniffing and the stored filename.

use bytes::Bytes;
use regex::Regex;
use std::sync::OnceLock;

use super::models::NewCvFile;
use crate::common::ApiError;

pub const MAX_CV_SIZE: usize = 5 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];
pub const ALLOWED_MIME_TYPES: [&str; 3] = [PDF_MIME, DOC_MIME, DOCX_MIME];

const GENERIC_MIME_TYPES: [&str; 2] = ["", "application/octet-stream"];

// DOCX is a ZIP container and DOC an OLE compound file; the sniffer may
// report either the document type or the bare container.
const SNIFFED_DOCUMENT_TYPES: [&str; 5] = [
    PDF_MIME,
    DOC_MIME,
    DOCX_MIME,
    "application/zip",
    "application/x-ole-storage",
];

const INVALID_TYPE: &str = "Invalid file type. Only PDF, DOC, and DOCX files are allowed.";

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9.-]").expect("filename pattern compiles"))
}

/// Lowercased extension including the dot, e.g. `.pdf`.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rfind('.')
        .map(|idx| filename[idx..].to_lowercase())
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        ".pdf" => Some(PDF_MIME),
        ".doc" => Some(DOC_MIME),
        ".docx" => Some(DOCX_MIME),
        _ => None,
    }
}

/// Checks the extension and declared content type, returning the MIME type to store.
///
/// A generic or missing declared type is replaced by the type implied by the extension.
pub fn resolve_mime_type(filename: &str, declared: Option<&str>) -> Result<String, ApiError> {
    let implied = extension_of(filename)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .as_deref()
        .and_then(mime_for_extension)
        .ok_or_else(|| ApiError::UnsupportedMediaType(INVALID_TYPE.to_string()))?;

    let declared = declared
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if GENERIC_MIME_TYPES.contains(&declared.as_str()) {
        return Ok(implied.to_string());
    }

    if ALLOWED_MIME_TYPES.contains(&declared.as_str()) {
        Ok(declared)
    } else {
        Err(ApiError::UnsupportedMediaType(INVALID_TYPE.to_string()))
    }
}

/// Rejects empty or oversized content and content recognised as something
/// other than a document. Content the sniffer cannot identify is accepted.
pub fn check_content(data: &[u8]) -> Result<(), ApiError> {
    if data.is_empty() {
        return Err(ApiError::ValidationError("Uploaded file is empty".to_string()));
    }

    if data.len() > MAX_CV_SIZE {
        return Err(ApiError::PayloadTooLarge(
            "File size too large. Maximum size is 5MB.".to_string(),
        ));
    }

    if let Some(kind) = infer::get(data) {
        if !SNIFFED_DOCUMENT_TYPES.contains(&kind.mime_type()) {
            return Err(ApiError::UnsupportedMediaType(format!(
                "File content does not match an allowed document type (detected {})",
                kind.mime_type()
            )));
        }
    }

    Ok(())
}

/// Final path component of a client-supplied name.
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim()
}

pub fn sanitize_filename(filename: &str) -> String {
    unsafe_chars().replace_all(filename, "_").into_owned()
}

/// `<unix millis>_<sanitized name>`
pub fn stored_filename(original_name: &str, millis: i64) -> String {
    format!("{}_{}", millis, sanitize_filename(original_name))
}

/// Runs every upload check and assembles the row to insert.
pub fn prepare_upload(
    original_name: &str,
    declared_mime: Option<&str>,
    content: Bytes,
    millis: i64,
) -> Result<NewCvFile, ApiError> {
    let original_name = base_name(original_name);
    if original_name.is_empty() {
        return Err(ApiError::ValidationError("No file uploaded".to_string()));
    }

    let mime_type = resolve_mime_type(original_name, declared_mime)?;
    check_content(&content)?;

    Ok(NewCvFile {
        filename: stored_filename(original_name, millis),
        original_name: original_name.to_string(),
        mime_type,
        content,
    })
}
