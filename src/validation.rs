//! Field-level checks for user records.
//!
//! Everything here is a pure function over borrowed input, so it can be called
//! from any task without coordination.

use thiserror::Error;

use crate::core::DomainError;

pub const MAX_NAME_CHARS: usize = 100;
pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 150;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("name too long: {len} characters, at most {max} allowed")]
    NameTooLong { len: usize, max: usize },

    #[error("age must be between 0 and 150, got {age}")]
    AgeOutOfRange { age: i32 },
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::Validation(err.to_string())
    }
}

/// Length is counted in characters, not bytes.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_CHARS,
        });
    }

    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange { age });
    }
    Ok(())
}

/// Checks the name first, then the age; reports the first violation.
pub fn validate_user(name: &str, age: i32) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_age(age)
}
