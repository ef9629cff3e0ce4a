//! Modelabs Domain Types
//!
//! This crate provides the core domain model for the Modelabs leaderboard:
//! the model records that get evaluated and ranked, the derived leaderboard
//! entries, and the dataset catalog records.
//!
//! ## Architecture
//!
//! - **identifiers**: Strongly-typed identifiers for models, datasets and jobs
//! - **model**: Model types, store partitions, model records and score updates
//! - **evaluation**: Evaluation requests and the jobs dispatched to workers
//! - **ranking**: Leaderboard entries derived from model records
//! - **dataset**: Dataset catalog records
//! - **errors**: Domain-level error types
//!
//! ## Usage
//!
//! ```rust
//! use modelabs_domain::model::ModelType;
//!
//! let model_type = ModelType::from_label("Large Language");
//! assert_eq!(model_type.partition(), "language-models");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod identifiers;
pub mod model;
pub mod ranking;

pub use dataset::{DatasetRecord, DatasetStatus, DatasetVisibility};
pub use errors::{DomainError, DomainResult};
pub use evaluation::{EvaluationJob, EvaluationRequest};
pub use identifiers::{DatasetId, JobId, ModelId};
pub use model::{ModelRecord, ModelType, ScoreUpdate};
pub use ranking::RankedEntry;
