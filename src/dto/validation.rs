//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest identifier accepted for channels and participants.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validates that an identifier is non-blank and at most 128 characters.
///
/// # Examples
///
/// ```ignore
/// validate_identifier("general")  // Ok
/// validate_identifier("   ")      // Err - blank
/// ```
pub fn validate_identifier(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("identifier_blank");
        err.message = Some("Identifier must not be blank".into());
        return Err(err);
    }

    let length = id.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        let mut err = ValidationError::new("identifier_length");
        err.message = Some(
            format!(
                "Identifier must be at most {MAX_IDENTIFIER_LENGTH} characters (got {length})"
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}
