//! Query-option resolution.
//!
//! Translates raw query-string parameters into the repository's typed
//! [`QueryOptions`]. Reserved parameter names drive pagination, sorting,
//! projection and populate; every other parameter becomes an equality
//! filter on the named field.

use std::collections::HashMap;

use serde_json::Value;

use cl_core::repositories::{Filter, Projection, QueryOptions, SortOrder, SortSpec};
use cl_shared::PageParams;

/// Parameter names with special meaning
const RESERVED: &[&str] = &["page", "page_limit", "sort", "fields", "populate"];

/// Resolve query-string parameters into repository query options
pub fn resolve(params: &HashMap<String, String>) -> QueryOptions {
    QueryOptions {
        filter: resolve_filter(params),
        sort: resolve_sort(params.get("sort")),
        projection: resolve_projection(params.get("fields")),
        page: resolve_page(params),
        populate: resolve_populate(params.get("populate")),
    }
}

/// Populate names for a single-document fetch
pub fn resolve_populate(param: Option<&String>) -> Vec<String> {
    param
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_filter(params: &HashMap<String, String>) -> Filter {
    let mut filter = Filter::new();
    // Deterministic order keeps the resolved filter stable across calls.
    let mut fields: Vec<(&String, &String)> = params
        .iter()
        .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
        .collect();
    fields.sort();

    for (key, value) in fields {
        filter = filter.eq(key.clone(), coerce(value));
    }
    filter
}

/// Interpret a query value the way the stored documents serialize it
fn coerce(value: &str) -> Value {
    if let Ok(int) = value.parse::<i64>() {
        return Value::from(int);
    }
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

fn resolve_sort(param: Option<&String>) -> SortSpec {
    let mut spec = SortSpec::new();
    let Some(value) = param else {
        return spec;
    };

    for key in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        spec = match key.strip_prefix('-') {
            Some(field) => spec.by(field, SortOrder::Desc),
            None => spec.by(key, SortOrder::Asc),
        };
    }
    spec
}

fn resolve_projection(param: Option<&String>) -> Projection {
    let Some(value) = param else {
        return Projection::All;
    };

    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for field in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match field.strip_prefix('-') {
            Some(field) => exclude.push(field.to_string()),
            None => include.push(field.to_string()),
        }
    }

    // An explicit include list wins over any excluded names.
    if !include.is_empty() {
        Projection::Include(include)
    } else if !exclude.is_empty() {
        Projection::Exclude(exclude)
    } else {
        Projection::All
    }
}

fn resolve_page(params: &HashMap<String, String>) -> PageParams {
    let page = params
        .get("page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let page_limit = params
        .get("page_limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);
    PageParams::new(page, page_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unreserved_params_become_filters() {
        let options = resolve(&params(&[("role", "admin"), ("page", "3")]));
        assert!(options.filter.matches(&json!({"role": "admin"})));
        assert!(!options.filter.matches(&json!({"role": "client"})));
        assert_eq!(options.page.page, 3);
    }

    #[test]
    fn test_numeric_and_boolean_values_are_coerced() {
        let options = resolve(&params(&[("rank", "7"), ("active", "true")]));
        assert!(options
            .filter
            .matches(&json!({"rank": 7, "active": true})));
        assert!(!options
            .filter
            .matches(&json!({"rank": "7", "active": true})));
    }

    #[test]
    fn test_sort_prefix_controls_direction() {
        let options = resolve(&params(&[("sort", "rank,-created_at")]));
        let keys = options.sort.keys();
        assert_eq!(keys[0], ("rank".to_string(), SortOrder::Asc));
        assert_eq!(keys[1], ("created_at".to_string(), SortOrder::Desc));
    }

    #[test]
    fn test_fields_include_and_exclude() {
        let include = resolve(&params(&[("fields", "email,display_name")]));
        assert!(matches!(include.projection, Projection::Include(ref f) if f.len() == 2));

        let exclude = resolve(&params(&[("fields", "-phone")]));
        assert!(matches!(exclude.projection, Projection::Exclude(ref f) if f == &["phone"]));
    }

    #[test]
    fn test_populate_splits_names() {
        let options = resolve(&params(&[("populate", "owner, reviews")]));
        assert_eq!(options.populate, vec!["owner", "reviews"]);
    }

    #[test]
    fn test_page_limit_is_clamped() {
        let options = resolve(&params(&[("page_limit", "1000")]));
        assert_eq!(options.page.page_limit, 100);
    }
}
