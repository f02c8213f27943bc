//! # CraftLink Infrastructure
//!
//! Concrete implementations of the core repository and delivery
//! interfaces: an in-process JSON document store and the mailer
//! adapters.

pub mod mailer;
pub mod store;

pub use mailer::LogMailer;
pub use store::{DocumentCollection, DocumentStore, StoreUserRepository};
