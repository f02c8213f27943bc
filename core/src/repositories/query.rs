//! Query primitives consumed by the generic repository.
//!
//! An external query-option resolver translates HTTP query parameters into
//! these values; the repository itself never sees raw request input.

use cl_shared::types::pagination::PageParams;
use serde_json::{Map, Value};

/// Equality filter over document fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// Create an empty filter that matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Check whether a document satisfies every condition
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

/// Sort direction for a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Ordered list of sort keys
#[derive(Debug, Clone, Default)]
pub struct SortSpec {
    keys: Vec<(String, SortOrder)>,
}

impl SortSpec {
    /// Create an empty sort specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sort key
    pub fn by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.keys.push((field.into(), order));
        self
    }

    /// Iterate over the sort keys in priority order
    pub fn keys(&self) -> &[(String, SortOrder)] {
        &self.keys
    }
}

/// Field projection applied to repository output
///
/// The internal version field is excluded regardless of what the caller
/// supplies; hidden fields are excluded unless explicitly included.
#[derive(Debug, Clone, Default)]
pub enum Projection {
    /// No caller-supplied projection
    #[default]
    All,
    /// Only the named fields
    Include(Vec<String>),
    /// All fields except the named ones
    Exclude(Vec<String>),
}

impl Projection {
    /// Check whether the caller explicitly asked for a field
    pub fn explicitly_includes(&self, field: &str) -> bool {
        match self {
            Projection::Include(fields) => fields.iter().any(|f| f == field),
            _ => false,
        }
    }
}

/// Complete set of options for a list query
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Equality filter
    pub filter: Filter,

    /// Sort keys (the identifier is always appended as a tie-breaker)
    pub sort: SortSpec,

    /// Output projection
    pub projection: Projection,

    /// Offset-based pagination
    pub page: PageParams,

    /// Relation names to populate, each resolved independently
    pub populate: Vec<String>,
}

impl QueryOptions {
    /// Create default options (no filter, natural sort, first page)
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_equality() {
        let filter = Filter::new().eq("role", "admin");
        assert!(filter.matches(&json!({"role": "admin", "name": "x"})));
        assert!(!filter.matches(&json!({"role": "client"})));
        assert!(!filter.matches(&json!({"name": "x"})));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_projection_explicit_include() {
        let proj = Projection::Include(vec!["password_hash".to_string()]);
        assert!(proj.explicitly_includes("password_hash"));
        assert!(!proj.explicitly_includes("email"));
        assert!(!Projection::All.explicitly_includes("password_hash"));
    }
}
