//! Testing utilities for Modelabs
//!
//! This crate provides testing utilities including:
//! - Fixtures for model records, leaderboard scenarios and datasets
//! - Builder patterns for test data construction
//! - Mock implementations of the store, dispatcher and evaluator ports
//!
//! # Examples
//!
//! ```
//! use modelabs_testing::{builders::*, fixtures::*};
//! use modelabs_domain::ModelType;
//!
//! let records = language_model_records();
//! assert_eq!(records.len(), 4);
//!
//! let record = ModelRecordBuilder::new("m1")
//!     .with_type(ModelType::Multimodal)
//!     .with_overall_score(71.5)
//!     .build();
//! assert_eq!(record.overall_score, Some(71.5));
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
pub use wiremock;
