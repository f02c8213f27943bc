//! Shared utilities and common types for the CraftLink server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response envelope and pagination types
//! - Validation utilities (email/mobile format checks)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, Environment, ServerConfig};
pub use types::{Envelope, PageInfo, PageParams, PagedDocs};
pub use utils::validation;
