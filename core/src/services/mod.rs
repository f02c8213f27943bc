//! Business logic services

pub mod auth;
pub mod mailer;
pub mod token;

pub use auth::AuthService;
pub use mailer::Mailer;
pub use token::TokenService;
