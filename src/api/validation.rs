//! Field checks for request bodies, collected into a single 400 response.

use crate::error::{ApiError, FieldErrors};

/// Turns a loosely-typed request body into the input a service accepts.
///
/// Bodies deserialize with every field optional so that a missing field is
/// reported next to the others instead of as a bare serde error.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, FieldErrors>;
}

/// Accumulates per-field failures while a body is being checked.
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: FieldErrors,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that must be present and non-blank.
    pub fn required(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            Some(_) => {
                self.fail(field, "should not be empty");
                None
            }
            None => {
                self.fail(field, "is required");
                None
            }
        }
    }

    /// A field that may be omitted but must be non-blank when given.
    pub fn non_empty(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if v.trim().is_empty() => {
                self.fail(field, "should not be empty");
                None
            }
            other => other,
        }
    }

    /// Passes the value through, recording a failure if it is not email-shaped.
    pub fn email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if is_email(&v) => Some(v),
            Some(_) => {
                self.fail(field, "must be an email");
                None
            }
            None => None,
        }
    }

    pub fn fail(&mut self, field: &str, message: &str) {
        // Keep the first complaint per field.
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| format!("{field} {message}"));
    }

    pub fn finish<T>(self, valid: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        // Every check above returned `Some` when it recorded no error.
        valid().ok_or(self.errors)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(field_errors: FieldErrors) -> Self {
        ApiError::validation_error("Validation failed", Some(field_errors))
    }
}

/// Loose structural check: one `@`, non-empty local part, dotted domain.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}
