//! # CraftLink Core
//!
//! Core business logic and domain layer for the CraftLink backend.
//! This crate contains domain entities, the authentication and token
//! services, repository interfaces, and error types that form the
//! foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::user::{Role, User};
pub use domain::value_objects::AuthSession;
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{
    Document, Filter, Projection, QueryOptions, Relation, Repository, SortOrder, SortSpec,
    UserRepository,
};
pub use services::{AuthService, Mailer, TokenService};
