//! Authentication service orchestrating registration, login and the
//! password-reset protocol

pub mod service;

pub use service::AuthService;
