//! Repository interfaces for data persistence.

pub mod document;
pub mod query;
pub mod repository;
pub mod user;

pub use document::{Document, Relation};
pub use query::{Filter, Projection, QueryOptions, SortOrder, SortSpec};
pub use repository::Repository;
pub use user::{MockUserRepository, UserRepository};
