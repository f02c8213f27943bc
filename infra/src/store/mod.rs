//! In-process JSON document store.
//!
//! Documents are stored as dynamic JSON objects keyed by collection name
//! and identifier, with an internal `__v` version counter the output
//! never exposes. Typed access is layered on top through
//! [`DocumentCollection`] handles that all share one store.

pub mod collection;
pub mod user_repository;

pub use collection::DocumentCollection;
pub use user_repository::StoreUserRepository;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use cl_core::repositories::Document;

/// Internal version field maintained on every stored document
pub(crate) const VERSION_FIELD: &str = "__v";

/// Shared in-memory document store
///
/// One instance backs every collection handle; cloning is cheap and all
/// clones see the same data.
#[derive(Clone, Default)]
pub struct DocumentStore {
    collections: Arc<RwLock<HashMap<String, HashMap<Uuid, Value>>>>,
}

impl DocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a typed handle onto the collection for `D`
    pub fn collection<D: Document>(&self) -> DocumentCollection<D> {
        DocumentCollection::new(self.clone())
    }

    pub(crate) fn collections(&self) -> &RwLock<HashMap<String, HashMap<Uuid, Value>>> {
        &self.collections
    }
}
