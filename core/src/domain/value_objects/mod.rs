//! Value objects returned by domain services.

pub mod auth_session;

pub use auth_session::AuthSession;
