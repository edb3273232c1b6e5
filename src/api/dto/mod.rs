//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `push` - Push request/response DTOs
//! - `error` - Common error response DTOs

mod error;
mod push;

pub use error::ErrorResponse;
pub use push::{DirectPushRequest, PushResponse, TestPushQuery};
