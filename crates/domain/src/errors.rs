//! Error types for the Modelabs domain.

/// Domain-level errors raised while constructing or parsing domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier did not satisfy its format rules
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Text did not name a known enum variant
    #[error("Unknown {kind}: {value}")]
    UnknownVariant {
        /// Which enum was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// A score was not a finite number
    #[error("Invalid score for {category}: {value}")]
    InvalidScore {
        /// Category name, or `overall`
        category: String,
        /// The rejected value
        value: f64,
    },
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            Self::InvalidScore { .. } => "INVALID_SCORE",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
