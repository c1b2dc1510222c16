//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player or game name, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates that a display name is not blank and fits in [`MAX_NAME_LENGTH`] characters.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("Anna")   // Ok
/// validate_display_name("   ")    // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be empty".into());
        return Err(err);
    }

    let length = trimmed.chars().count();
    if length > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(
            format!("Name must be at most {MAX_NAME_LENGTH} characters (got {length})").into(),
        );
        return Err(err);
    }

    Ok(())
}
