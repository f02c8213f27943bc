//! Error-to-response translation

pub mod error;

pub use error::{ApiError, ApiResult};
