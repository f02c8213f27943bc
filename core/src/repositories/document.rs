//! The `Document` trait: the typed contract every stored entity satisfies.
//!
//! This replaces the original's untyped model handle with a compile-time
//! interface: each entity names its collection, exposes its identifier,
//! runs its own schema validation, and declares which fields stay hidden
//! and which reference fields can be populated.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::DomainResult;

/// A reference field resolvable into a document from another collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Name callers use in a populate list
    pub name: &'static str,
    /// Field on this document holding the referenced identifier
    pub field: &'static str,
    /// Collection the referenced document lives in
    pub collection: &'static str,
}

/// Contract for entities stored through the generic repository
pub trait Document:
    Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Name of the collection this entity is stored in
    const COLLECTION: &'static str;

    /// Human-readable name used in error messages
    const RESOURCE: &'static str = "Document";

    /// Stable unique identifier
    fn id(&self) -> Uuid;

    /// Full schema validation, run on create and on the merged result of
    /// every update
    fn validate(&self) -> DomainResult<()>;

    /// Fields excluded from repository output unless explicitly projected in
    fn hidden_fields() -> &'static [&'static str] {
        &[]
    }

    /// Fields whose values must be unique within the collection
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Reference fields resolvable via populate
    fn relations() -> &'static [Relation] {
        &[]
    }
}
