//! Typed user repository backed by the document store.
//!
//! The generic collection surface strips hidden fields from its output;
//! authentication needs the full record, password hash included, so this
//! repository reads the stored documents directly and deserializes them
//! into the entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use cl_core::domain::entities::user::User;
use cl_core::errors::{DomainError, DomainResult};
use cl_core::repositories::{Document, Filter, QueryOptions, Repository, UserRepository};

use super::{DocumentCollection, DocumentStore, VERSION_FIELD};

/// User repository over the shared document store
pub struct StoreUserRepository {
    store: DocumentStore,
    collection: DocumentCollection<User>,
}

impl StoreUserRepository {
    /// Create a repository sharing the given store
    pub fn new(store: DocumentStore) -> Self {
        Self {
            collection: store.collection::<User>(),
            store,
        }
    }

    fn user_from_stored(stored: &Value) -> DomainResult<User> {
        let mut value = stored.clone();
        if let Value::Object(ref mut map) = value {
            map.remove(VERSION_FIELD);
        }
        serde_json::from_value(value).map_err(|e| DomainError::Internal {
            message: format!("Corrupt user record: {}", e),
        })
    }

    /// Replace the stored record for an existing user, bumping the version
    async fn replace(&self, user: User) -> DomainResult<User> {
        let mut collections = self.store.collections().write().await;
        let Some(collection) = collections.get_mut(User::COLLECTION) else {
            return Err(DomainError::not_found("User"));
        };
        let Some(existing) = collection.get(&user.id) else {
            return Err(DomainError::not_found("User"));
        };

        let version = existing
            .get(VERSION_FIELD)
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let mut stored = serde_json::to_value(&user).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize user: {}", e),
        })?;
        if let Value::Object(ref mut map) = stored {
            map.insert(VERSION_FIELD.to_string(), Value::from(version + 1));
        }
        collection.insert(user.id, stored);

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let collections = self.store.collections().read().await;

        let stored = collections.get(User::COLLECTION).and_then(|col| {
            col.values()
                .find(|doc| doc.get("email").and_then(Value::as_str) == Some(email))
        });

        stored.map(Self::user_from_stored).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let collections = self.store.collections().read().await;

        collections
            .get(User::COLLECTION)
            .and_then(|col| col.get(&id))
            .map(Self::user_from_stored)
            .transpose()
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let collections = self.store.collections().read().await;

        let candidate = collections.get(User::COLLECTION).and_then(|col| {
            col.values().find(|doc| {
                doc.get("password_reset_token").and_then(Value::as_str) == Some(token_hash)
            })
        });

        let Some(user) = candidate.map(Self::user_from_stored).transpose()? else {
            return Ok(None);
        };

        // Hash and expiry are matched as one condition.
        Ok(user.has_live_reset_token(now).then_some(user))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.collection.create_one(user.clone()).await?;
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        user.validate()?;
        self.replace(user).await
    }

    async fn save_unchecked(&self, user: User) -> Result<User, DomainError> {
        self.replace(user).await
    }
}

#[async_trait]
impl Repository<User> for StoreUserRepository {
    async fn get_all(&self, options: &QueryOptions) -> DomainResult<Vec<Value>> {
        self.collection.get_all(options).await
    }

    async fn get_one_by_id(&self, id: Uuid, populate: &[String]) -> DomainResult<Option<Value>> {
        self.collection.get_one_by_id(id, populate).await
    }

    async fn create_one(&self, doc: User) -> DomainResult<Value> {
        self.collection.create_one(doc).await
    }

    async fn update_one_by_id(
        &self,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> DomainResult<Option<Value>> {
        self.collection.update_one_by_id(id, fields).await
    }

    async fn delete_one_by_id(&self, id: Uuid) -> DomainResult<()> {
        self.collection.delete_one_by_id(id).await
    }

    async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        self.collection.count(filter).await
    }

    async fn is_exist(&self, id: Uuid) -> DomainResult<bool> {
        self.collection.is_exist(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::domain::entities::user::Role;
    use cl_core::services::auth::service::hash_token;

    fn user(email: &str) -> User {
        let mut user = User::new(email, "+61412345678", "Test", Role::Client);
        user.set_password("s3cret-pass").unwrap();
        user
    }

    fn repo() -> StoreUserRepository {
        StoreUserRepository::new(DocumentStore::new())
    }

    #[tokio::test]
    async fn test_typed_lookup_keeps_password_hash() {
        let repo = repo();
        let created = repo.create(user("a@example.com")).await.unwrap();

        let typed = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert!(!typed.password_hash.is_empty());

        // The generic surface hides it.
        let generic = repo.get_one_by_id(created.id, &[]).await.unwrap().unwrap();
        assert!(generic.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = repo();
        repo.create(user("a@example.com")).await.unwrap();

        let err = repo.create(user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn test_save_bumps_version_and_persists() {
        let repo = repo();
        let mut created = repo.create(user("a@example.com")).await.unwrap();

        created.display_name = "Renamed".to_string();
        repo.save(created.clone()).await.unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.display_name, "Renamed");
    }

    #[tokio::test]
    async fn test_save_unknown_user_is_not_found() {
        let repo = repo();
        let err = repo.save(user("ghost@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_save_unchecked_skips_validation() {
        let repo = repo();
        let mut created = repo.create(user("a@example.com")).await.unwrap();

        // A lone reset token fails schema validation.
        created.password_reset_token = Some("hash".to_string());
        assert!(repo.save(created.clone()).await.is_err());
        assert!(repo.save_unchecked(created).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_by_reset_token_requires_live_expiry() {
        let repo = repo();
        let mut created = repo.create(user("a@example.com")).await.unwrap();
        let hash = hash_token("raw-secret");
        created.set_reset_token(hash.clone(), chrono::Duration::minutes(10));
        repo.save_unchecked(created).await.unwrap();

        let now = Utc::now();
        assert!(repo.find_by_reset_token(&hash, now).await.unwrap().is_some());
        assert!(repo
            .find_by_reset_token(&hash_token("other"), now)
            .await
            .unwrap()
            .is_none());

        // Past the window the same hash matches nothing.
        let later = now + chrono::Duration::minutes(11);
        assert!(repo
            .find_by_reset_token(&hash, later)
            .await
            .unwrap()
            .is_none());
    }
}
