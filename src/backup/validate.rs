//! Validation functions for configuration values.
//!
//! Custom checks plugged into `#[validate(custom(function = ...))]` on the job
//! config. Filesystem checks happen later, when a job is resolved.

use indexmap::IndexMap;
use validator::ValidationError;

pub fn validate_not_blank<S: AsRef<str>>(value: S) -> Result<(), ValidationError> {
    if value.as_ref().trim().is_empty() {
        return Err(ValidationError::new("BlankValue").with_message("must not be empty".into()));
    }

    Ok(())
}

pub fn validate_include_paths(include: &IndexMap<String, bool>) -> Result<(), ValidationError> {
    if let Some(path) = include.keys().find(|p| p.trim_matches('/').trim().is_empty()) {
        return Err(ValidationError::new("InvalidIncludePath")
            .with_message(format!("include path {path:?} names no directory").into()));
    }

    Ok(())
}
