//! Generic repository implementation over one store collection.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use cl_core::errors::{DomainError, DomainResult};
use cl_core::repositories::{Document, Filter, Projection, QueryOptions, Repository, SortOrder};

use super::{DocumentStore, VERSION_FIELD};

/// Typed handle onto one collection of the shared document store
pub struct DocumentCollection<D: Document> {
    store: DocumentStore,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> DocumentCollection<D> {
    /// Create a handle; the underlying collection comes into existence on
    /// first write
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Shape a stored document for output
    ///
    /// The version field never survives; hidden fields survive only when
    /// the caller projected them in by name; then the caller's own
    /// include/exclude projection is applied on top.
    fn project(stored: &Value, projection: &Projection) -> Value {
        let mut map = match stored {
            Value::Object(map) => map.clone(),
            other => return other.clone(),
        };

        map.remove(VERSION_FIELD);
        for field in D::hidden_fields() {
            if !projection.explicitly_includes(field) {
                map.remove(*field);
            }
        }

        match projection {
            Projection::All => {}
            Projection::Include(fields) => {
                // The identifier is always kept, like it or not.
                map.retain(|key, _| key == "id" || fields.iter().any(|f| f == key));
            }
            Projection::Exclude(fields) => {
                for field in fields {
                    map.remove(field);
                }
            }
        }

        Value::Object(map)
    }

    /// Resolve populate entries against the output document
    ///
    /// Each entry is handled independently; names with no matching
    /// relation are skipped without error, as are reference values that
    /// point at nothing.
    fn populate(
        collections: &HashMap<String, HashMap<Uuid, Value>>,
        output: &mut Value,
        populate: &[String],
    ) {
        let Value::Object(map) = output else {
            return;
        };

        for name in populate {
            let Some(relation) = D::relations().iter().find(|r| r.name == name) else {
                continue;
            };

            let Some(reference) = map.get(relation.field).and_then(Value::as_str) else {
                continue;
            };
            let Ok(reference_id) = Uuid::parse_str(reference) else {
                continue;
            };

            let resolved = collections
                .get(relation.collection)
                .and_then(|col| col.get(&reference_id));

            if let Some(doc) = resolved {
                let mut doc = doc.clone();
                if let Value::Object(ref mut m) = doc {
                    m.remove(VERSION_FIELD);
                }
                map.insert(relation.field.to_string(), doc);
            }
        }
    }

    /// Reject values that collide with another document on a declared
    /// unique field
    fn ensure_unique(
        collection: &HashMap<Uuid, Value>,
        candidate: &Value,
        exclude: Option<Uuid>,
    ) -> DomainResult<()> {
        for field in D::unique_fields() {
            let Some(value) = candidate.get(*field) else {
                continue;
            };
            let taken = collection.iter().any(|(id, doc)| {
                Some(*id) != exclude && doc.get(*field) == Some(value)
            });
            if taken {
                return Err(DomainError::Duplicate {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Total order over JSON values for sorting
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => match (a, b) {
                (Value::Null, Value::Null) => Ordering::Equal,
                (Value::Null, _) => Ordering::Less,
                (_, Value::Null) => Ordering::Greater,
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(Ordering::Equal),
                (Value::String(x), Value::String(y)) => x.cmp(y),
                // Mixed or structured values fall back to their text form.
                _ => a.to_string().cmp(&b.to_string()),
            },
        }
    }
}

#[async_trait]
impl<D: Document> Repository<D> for DocumentCollection<D> {
    async fn get_all(&self, options: &QueryOptions) -> DomainResult<Vec<Value>> {
        let collections = self.store.collections().read().await;

        let mut matched: Vec<(Uuid, &Value)> = collections
            .get(D::COLLECTION)
            .map(|col| {
                col.iter()
                    .filter(|(_, doc)| options.filter.matches(doc))
                    .map(|(id, doc)| (*id, doc))
                    .collect()
            })
            .unwrap_or_default();

        // Caller's keys first, identifier last as the stable tie-breaker.
        matched.sort_by(|(id_a, doc_a), (id_b, doc_b)| {
            for (field, order) in options.sort.keys() {
                let ordering = Self::compare_values(doc_a.get(field), doc_b.get(field));
                let ordering = match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            id_a.cmp(id_b)
        });

        let docs = matched
            .into_iter()
            .skip(options.page.skip())
            .take(options.page.limit())
            .map(|(_, stored)| {
                let mut output = Self::project(stored, &options.projection);
                Self::populate(&collections, &mut output, &options.populate);
                output
            })
            .collect();

        Ok(docs)
    }

    async fn get_one_by_id(&self, id: Uuid, populate: &[String]) -> DomainResult<Option<Value>> {
        let collections = self.store.collections().read().await;

        let stored = collections
            .get(D::COLLECTION)
            .and_then(|col| col.get(&id));

        Ok(stored.map(|stored| {
            let mut output = Self::project(stored, &Projection::All);
            Self::populate(&collections, &mut output, populate);
            output
        }))
    }

    async fn create_one(&self, doc: D) -> DomainResult<Value> {
        doc.validate()?;

        let id = doc.id();
        let mut stored = serde_json::to_value(&doc).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize document: {}", e),
        })?;

        let mut collections = self.store.collections().write().await;
        let collection = collections.entry(D::COLLECTION.to_string()).or_default();

        if collection.contains_key(&id) {
            return Err(DomainError::Duplicate {
                field: "id".to_string(),
            });
        }
        Self::ensure_unique(collection, &stored, None)?;

        if let Value::Object(ref mut map) = stored {
            map.insert(VERSION_FIELD.to_string(), Value::from(0));
        }
        collection.insert(id, stored.clone());

        Ok(Self::project(&stored, &Projection::All))
    }

    async fn update_one_by_id(
        &self,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> DomainResult<Option<Value>> {
        let mut collections = self.store.collections().write().await;
        let collection = collections.entry(D::COLLECTION.to_string()).or_default();

        let Some(existing) = collection.get(&id) else {
            return Ok(None);
        };

        let mut merged = existing.clone();
        if let Value::Object(ref mut map) = merged {
            for (key, value) in fields {
                // The identifier and version counter are not writable.
                if key == "id" || key == VERSION_FIELD {
                    continue;
                }
                map.insert(key, value);
            }
        }

        // The merged result must still satisfy full schema validation.
        let mut typed_input = merged.clone();
        if let Value::Object(ref mut map) = typed_input {
            map.remove(VERSION_FIELD);
        }
        let typed: D = serde_json::from_value(typed_input)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        typed.validate()?;

        Self::ensure_unique(collection, &merged, Some(id))?;

        if let Value::Object(ref mut map) = merged {
            let version = map
                .get(VERSION_FIELD)
                .and_then(Value::as_i64)
                .unwrap_or(0);
            map.insert(VERSION_FIELD.to_string(), Value::from(version + 1));
        }
        collection.insert(id, merged.clone());

        Ok(Some(Self::project(&merged, &Projection::All)))
    }

    async fn delete_one_by_id(&self, id: Uuid) -> DomainResult<()> {
        let mut collections = self.store.collections().write().await;
        if let Some(collection) = collections.get_mut(D::COLLECTION) {
            collection.remove(&id);
        }
        Ok(())
    }

    async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        let collections = self.store.collections().read().await;

        let count = collections
            .get(D::COLLECTION)
            .map(|col| col.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);

        Ok(count as u64)
    }

    async fn is_exist(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.get_one_by_id(id, &[]).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::repositories::{Relation, SortSpec};
    use cl_shared::PageParams;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Profile {
        id: Uuid,
        name: String,
    }

    impl Document for Profile {
        const COLLECTION: &'static str = "profiles";

        fn id(&self) -> Uuid {
            self.id
        }

        fn validate(&self) -> DomainResult<()> {
            if self.name.is_empty() {
                return Err(DomainError::validation("name: must not be empty"));
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Job {
        id: Uuid,
        title: String,
        rank: i64,
        owner_id: Uuid,
        secret_note: String,
    }

    impl Document for Job {
        const COLLECTION: &'static str = "jobs";

        fn id(&self) -> Uuid {
            self.id
        }

        fn validate(&self) -> DomainResult<()> {
            if self.title.is_empty() {
                return Err(DomainError::validation("title: must not be empty"));
            }
            Ok(())
        }

        fn hidden_fields() -> &'static [&'static str] {
            &["secret_note"]
        }

        fn unique_fields() -> &'static [&'static str] {
            &["title"]
        }

        fn relations() -> &'static [Relation] {
            &[Relation {
                name: "owner",
                field: "owner_id",
                collection: "profiles",
            }]
        }
    }

    fn job(title: &str, rank: i64, owner_id: Uuid) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.to_string(),
            rank,
            owner_id,
            secret_note: "internal".to_string(),
        }
    }

    async fn seeded(count: i64) -> (DocumentStore, DocumentCollection<Job>) {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        for i in 1..=count {
            jobs.create_one(job(&format!("job-{:03}", i), i, Uuid::new_v4()))
                .await
                .unwrap();
        }
        (store, jobs)
    }

    #[tokio::test]
    async fn test_page_two_returns_middle_slice() {
        let (_, jobs) = seeded(25).await;

        let options = QueryOptions {
            sort: SortSpec::new().by("rank", SortOrder::Asc),
            page: PageParams {
                page: 2,
                page_limit: 10,
            },
            ..Default::default()
        };
        let page = jobs.get_all(&options).await.unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page[0]["rank"], 11);
        assert_eq!(page[9]["rank"], 20);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let (_, jobs) = seeded(5).await;

        let options = QueryOptions {
            page: PageParams {
                page: 4,
                page_limit: 10,
            },
            ..Default::default()
        };
        assert!(jobs.get_all(&options).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sort_descending_with_id_tiebreaker() {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        // Same rank everywhere, so ordering falls through to the id.
        for i in 0..4 {
            jobs.create_one(job(&format!("tied-{}", i), 7, Uuid::new_v4()))
                .await
                .unwrap();
        }

        let options = QueryOptions {
            sort: SortSpec::new().by("rank", SortOrder::Desc),
            ..Default::default()
        };
        let all = jobs.get_all(&options).await.unwrap();

        let ids: Vec<&str> = all.iter().map(|d| d["id"].as_str().unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_output_never_contains_version_or_hidden_fields() {
        let (_, jobs) = seeded(1).await;

        let all = jobs.get_all(&QueryOptions::new()).await.unwrap();
        let doc = all[0].as_object().unwrap();
        assert!(!doc.contains_key(VERSION_FIELD));
        assert!(!doc.contains_key("secret_note"));
    }

    #[tokio::test]
    async fn test_explicit_projection_reveals_hidden_field() {
        let (_, jobs) = seeded(1).await;

        let options = QueryOptions {
            projection: Projection::Include(vec![
                "title".to_string(),
                "secret_note".to_string(),
            ]),
            ..Default::default()
        };
        let all = jobs.get_all(&options).await.unwrap();
        let doc = all[0].as_object().unwrap();

        assert_eq!(doc["secret_note"], "internal");
        assert!(doc.contains_key("id"));
        assert!(!doc.contains_key("rank"));
    }

    #[tokio::test]
    async fn test_populate_resolves_known_relation() {
        let store = DocumentStore::new();
        let profiles = store.collection::<Profile>();
        let jobs = store.collection::<Job>();

        let owner = Profile {
            id: Uuid::new_v4(),
            name: "Olga".to_string(),
        };
        profiles.create_one(owner.clone()).await.unwrap();
        let created = jobs.create_one(job("tiling", 1, owner.id)).await.unwrap();
        let job_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

        let fetched = jobs
            .get_one_by_id(job_id, &["owner".to_string()])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched["owner_id"]["name"], "Olga");
        assert!(fetched["owner_id"].get(VERSION_FIELD).is_none());
    }

    #[tokio::test]
    async fn test_populate_ignores_unknown_relation() {
        let (_, jobs) = seeded(1).await;
        let all = jobs.get_all(&QueryOptions::new()).await.unwrap();
        let job_id = Uuid::parse_str(all[0]["id"].as_str().unwrap()).unwrap();

        // "nothing" names no relation; the fetch must still succeed.
        let fetched = jobs
            .get_one_by_id(job_id, &["nothing".to_string()])
            .await
            .unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_populate_dangling_reference_left_as_is() {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        let ghost = Uuid::new_v4();
        let created = jobs.create_one(job("roofing", 1, ghost)).await.unwrap();
        let job_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

        let fetched = jobs
            .get_one_by_id(job_id, &["owner".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched["owner_id"], ghost.to_string());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_unique_field() {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        jobs.create_one(job("plumbing", 1, Uuid::new_v4())).await.unwrap();

        let err = jobs
            .create_one(job("plumbing", 2, Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { ref field } if field == "title"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_document() {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        let err = jobs.create_one(job("", 1, Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_and_validates() {
        let (_, jobs) = seeded(1).await;
        let all = jobs.get_all(&QueryOptions::new()).await.unwrap();
        let job_id = Uuid::parse_str(all[0]["id"].as_str().unwrap()).unwrap();

        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String("renamed".to_string()));
        let updated = jobs.update_one_by_id(job_id, fields).await.unwrap().unwrap();
        assert_eq!(updated["title"], "renamed");
        assert_eq!(updated["rank"], 1);

        // An update that breaks the schema is rejected whole.
        let mut bad = Map::new();
        bad.insert("title".to_string(), Value::String(String::new()));
        let err = jobs.update_one_by_id(job_id, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_id_returns_none() {
        let (_, jobs) = seeded(1).await;
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String("x".to_string()));
        let result = jobs.update_one_by_id(Uuid::new_v4(), fields).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_silent_about_misses() {
        let (_, jobs) = seeded(1).await;
        let all = jobs.get_all(&QueryOptions::new()).await.unwrap();
        let job_id = Uuid::parse_str(all[0]["id"].as_str().unwrap()).unwrap();

        jobs.delete_one_by_id(job_id).await.unwrap();
        assert!(!jobs.is_exist(job_id).await.unwrap());

        // Deleting an id that matches nothing is still Ok.
        jobs.delete_one_by_id(job_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let store = DocumentStore::new();
        let jobs = store.collection::<Job>();
        for i in 0..3 {
            jobs.create_one(job(&format!("a-{}", i), 1, Uuid::new_v4()))
                .await
                .unwrap();
        }
        jobs.create_one(job("b", 2, Uuid::new_v4())).await.unwrap();

        assert_eq!(jobs.count(&Filter::new()).await.unwrap(), 4);
        assert_eq!(jobs.count(&Filter::new().eq("rank", 1)).await.unwrap(), 3);
    }
}
