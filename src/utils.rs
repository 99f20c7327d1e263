//! Small helpers for caller-input validation and display-name sanitization

use crate::error::{Error, Result};

/// Placeholder title used until a manifest provides a real one (or when
/// sanitization leaves nothing behind).
pub const DEFAULT_TITLE: &str = "book";

/// Validate a caller-supplied source identifier.
///
/// Source identifiers are interpolated into outbound request URLs, so they are
/// restricted to ASCII letters and digits. Anything else is rejected before a
/// job is created.
///
/// # Examples
///
/// ```
/// use flipbook_dl::utils::validate_source_id;
///
/// assert!(validate_source_id("abc123").is_ok());
/// assert!(validate_source_id("../etc/passwd").is_err());
/// assert!(validate_source_id("").is_err());
/// ```
pub fn validate_source_id(source_id: &str) -> Result<()> {
    if source_id.is_empty() {
        return Err(Error::Validation {
            message: "source_id must not be empty".to_string(),
            field: Some("source_id".to_string()),
        });
    }

    if !source_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::Validation {
            message: "source_id must contain only ASCII letters and digits".to_string(),
            field: Some("source_id".to_string()),
        });
    }

    Ok(())
}

/// Sanitize a book title for use as a download filename.
///
/// Characters that are unsafe in filenames (`< > : " / \ | ? *`) and control
/// characters are replaced with underscores. A title that sanitizes to nothing
/// (or only whitespace) falls back to [`DEFAULT_TITLE`].
pub fn sanitize_title(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}
