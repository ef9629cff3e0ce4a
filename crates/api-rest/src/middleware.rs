//! HTTP middleware components.
//!
//! - Request ID propagation/generation
//! - Request logging

pub mod logging;
pub mod request_id;

pub use logging::logging_middleware;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
