//! Validation Framework
//!
//! Field rules for user-supplied dataset metadata, checked with `validator`.

use crate::ApplicationError;
use validator::{Validate, ValidationErrors};

/// Upper bound on dataset name length
pub const MAX_NAME_LENGTH: u64 = 200;

/// Upper bound on description length
pub const MAX_DESCRIPTION_LENGTH: u64 = 1000;

/// Upper bound on the number of tags
pub const MAX_TAGS: u64 = 10;

/// User-editable metadata attached to a dataset upload
#[derive(Debug, Clone, Validate)]
pub struct DatasetMetadata {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: String,

    #[validate(length(max = 10), custom = "validate_tags")]
    pub tags: Vec<String>,

    #[validate(email)]
    pub user_email: Option<String>,
}

fn validate_tags(tags: &[String]) -> Result<(), validator::ValidationError> {
    if tags.iter().any(|tag| tag.trim().is_empty() || tag.len() > 50) {
        return Err(validator::ValidationError::new("tag_length"));
    }
    Ok(())
}

impl DatasetMetadata {
    /// Run every rule, mapping failures to `ValidationFailed`
    pub fn ensure_valid(&self) -> Result<(), ApplicationError> {
        self.validate().map_err(describe)
    }
}

fn describe(errors: ValidationErrors) -> ApplicationError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{} ({})", field, codes.join(", "))
        })
        .collect();
    fields.sort();

    ApplicationError::ValidationFailed(format!("invalid fields: {}", fields.join("; ")))
}
