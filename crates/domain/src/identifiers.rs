//! Strongly-typed identifier types for the Modelabs domain.
//!
//! Dataset and job identifiers are generated here and use UUID v7 for
//! time-ordering. Model identifiers are assigned by whoever registers the
//! model, so they are opaque strings.

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new ID with a time-ordered UUID v7
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create an ID from an existing UUID
            #[inline]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get a reference to the underlying UUID
            #[inline]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(DatasetId, "Unique identifier for catalog datasets");

define_id!(JobId, "Unique identifier for dispatched evaluation jobs");

/// Identifier of a model document inside its partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Create a model ID, rejecting empty input
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "model id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModelId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id1 = DatasetId::new();
        let s = id1.to_string();
        let id2: DatasetId = s.parse().unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_different_id_types() {
        let uuid = Uuid::now_v7();
        let dataset_id = DatasetId::from_uuid(uuid);
        let job_id = JobId::from_uuid(uuid);

        assert_eq!(dataset_id.as_uuid(), job_id.as_uuid());
    }

    #[test]
    fn test_model_id_rejects_empty() {
        assert!(ModelId::new("").is_err());
        assert_eq!(ModelId::new("gpt-4o").unwrap().as_str(), "gpt-4o");
    }

    #[test]
    fn test_model_id_serde_is_transparent() {
        let id = ModelId::new("claude").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"claude\"");

        let err = serde_json::from_str::<ModelId>("\"\"");
        assert!(err.is_err());
    }
}
