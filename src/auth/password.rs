/// Password hashing and verification
///
/// bcrypt with the library default cost; the salt lives inside the hash
/// string, and `bcrypt::verify` recomputes and compares without exposing
/// a timing side channel on the comparison.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash a password after checking strength requirements.
///
/// # Errors
/// Returns a validation error for weak passwords and an internal error
/// if bcrypt itself fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password_strength(password)?;

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

/// 8..=128 characters, at least one digit, one lowercase, one uppercase.
/// The upper bound also caps the bcrypt input size.
fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(
            ValidationError::TooShort("password".to_string(), MIN_PASSWORD_LENGTH).into(),
        );
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_LENGTH).into());
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        )
        .into());
    }

    Ok(())
}
