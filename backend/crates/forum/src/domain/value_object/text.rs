//! Bounded free-text fields (titles)

use kernel::error::app_error::{AppError, AppResult};

pub const TOPIC_TITLE_MAX_LENGTH: usize = 50;
pub const THREAD_TITLE_MAX_LENGTH: usize = 50;
pub const POST_TITLE_MAX_LENGTH: usize = 255;

/// Trim and check a required title against its limit
pub fn title(field: &'static str, raw: impl AsRef<str>, max: usize) -> AppResult<String> {
    let value = raw.as_ref().trim();

    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} cannot be empty")));
    }

    let len = value.chars().count();
    if len > max {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }

    Ok(value.to_string())
}
