//! Dataset catalog records.

use crate::errors::DomainError;
use crate::identifiers::DatasetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// File extensions accepted for dataset uploads
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["json", "csv", "txt", "jsonl"];

/// Processing state of an uploaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    /// Upload accepted, file not yet stored
    Processing,
    /// File stored and record visible
    Ready,
    /// Upload failed
    Failed,
}

/// Who can see a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetVisibility {
    /// Listed for everyone
    #[default]
    Public,
    /// Listed for the owner only
    Private,
}

impl FromStr for DatasetVisibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(DomainError::UnknownVariant {
                kind: "visibility",
                value: other.to_string(),
            }),
        }
    }
}

/// Metadata for one uploaded dataset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    /// Catalog id
    pub id: DatasetId,
    /// Display name
    pub name: String,
    /// Uploading user
    pub user_id: String,
    /// Contact address of the uploader, if given
    pub user_email: Option<String>,
    /// Size in bytes
    pub file_size: u64,
    /// Lower-case file extension, e.g. `jsonl`
    pub file_type: String,
    /// Upload time; listings are newest first
    pub uploaded_at: DateTime<Utc>,
    /// Free-text description, possibly empty
    pub description: String,
    /// Processing state
    pub status: DatasetStatus,
    /// Download counter
    pub downloads: u64,
    /// Listing visibility
    pub visibility: DatasetVisibility,
    /// Free-form tags used for filtering
    pub tags: Vec<String>,
    /// Blob store key of the uploaded file
    pub storage_key: String,
}

impl DatasetRecord {
    /// Whether `query` appears in the name or description, ignoring case
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    /// Whether the dataset carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Lower-case extension of `file_name` if it is an accepted dataset format
pub fn dataset_file_type(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_file_type() {
        assert_eq!(dataset_file_type("mmlu.JSONL").as_deref(), Some("jsonl"));
        assert_eq!(dataset_file_type("gsm8k.csv").as_deref(), Some("csv"));
        assert_eq!(dataset_file_type("weights.bin"), None);
        assert_eq!(dataset_file_type("README"), None);
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("Private".parse::<DatasetVisibility>().unwrap(), DatasetVisibility::Private);
        assert!("shared".parse::<DatasetVisibility>().is_err());
    }
}
