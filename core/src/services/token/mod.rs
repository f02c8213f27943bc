//! Token service for JWT generation and verification

pub mod service;

pub use service::TokenService;
