// Helper functions for safe logging, timestamps and response headers

use chrono::{DateTime, SecondsFormat, Utc};

use super::ApiError;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.is_ascii() && token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Formats an instant the way every timestamp column stores it.
///
/// Fixed-width UTC with milliseconds, so lexical order equals time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Builds an `attachment` Content-Disposition value for `filename`.
///
/// The plain `filename` parameter is reduced to printable ASCII; the exact
/// name travels in the RFC 5987 `filename*` parameter.
pub fn attachment_disposition(filename: &str) -> String {
    let ascii_fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback,
        urlencoding::encode(filename)
    )
}

/// Parses a numeric path id, rejecting anything that is not a positive integer.
pub fn parse_path_id(raw: &str, message: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
