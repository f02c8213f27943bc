//! Request middleware: authentication, role gating and CORS

pub mod auth;
pub mod cors;
pub mod role;

pub use auth::{AuthContext, AuthVerifier, Protect};
pub use role::RequireRole;
