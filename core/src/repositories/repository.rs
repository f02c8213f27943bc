//! Generic repository trait: uniform CRUD and query surface over one
//! document type.
//!
//! Output documents are dynamic JSON values so that projection, populate
//! and version-stripping are expressible; typed access goes through the
//! entity-specific repositories built on the same store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::repositories::document::Document;
use crate::repositories::query::{Filter, QueryOptions};

/// Uniform CRUD + query surface parametrized by a document type
#[async_trait]
pub trait Repository<D: Document>: Send + Sync {
    /// List documents matching the options
    ///
    /// Pagination is offset-based (`skip = (page - 1) * page_limit`); the
    /// identifier is appended to the sort as a stable tie-breaker; the
    /// internal version field never appears in the output; each populate
    /// entry is resolved independently and unknown relation names are
    /// ignored without error.
    async fn get_all(&self, options: &QueryOptions) -> DomainResult<Vec<Value>>;

    /// Fetch a single document by id
    ///
    /// `Ok(None)` is a valid, non-error result; the caller decides how to
    /// react to absence.
    async fn get_one_by_id(&self, id: Uuid, populate: &[String]) -> DomainResult<Option<Value>>;

    /// Validate and persist a new document, returning it with the internal
    /// version field stripped
    async fn create_one(&self, doc: D) -> DomainResult<Value>;

    /// Merge `fields` into the stored document, re-run full schema
    /// validation on the result, and return the post-update document
    ///
    /// `Ok(None)` signals the id did not match any record at update time.
    async fn update_one_by_id(
        &self,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> DomainResult<Option<Value>>;

    /// Delete a document by id
    ///
    /// Always returns unit regardless of whether a record matched; callers
    /// that need to report "not found" must pre-check existence.
    async fn delete_one_by_id(&self, id: Uuid) -> DomainResult<()>;

    /// Count documents matching the filter
    async fn count(&self, filter: &Filter) -> DomainResult<u64>;

    /// Existence check, implemented as a full fetch-by-id and boolean cast
    ///
    /// The result is stale the moment it is used by a subsequent write.
    async fn is_exist(&self, id: Uuid) -> DomainResult<bool>;
}
