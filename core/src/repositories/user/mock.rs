//! Mock implementation of the user repositories for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::document::Document;
use crate::repositories::query::{Filter, QueryOptions};
use crate::repositories::repository::Repository;

use super::trait_::UserRepository;

/// In-memory user repository for unit tests
///
/// Implements both the typed [`UserRepository`] and the generic
/// [`Repository<User>`] so services that use either surface can be tested
/// without the real store.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Serialize a user the way the generic repository would: hidden
    /// fields stripped from the output.
    fn to_output(user: &User) -> Value {
        let mut value = serde_json::to_value(user).unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = value {
            for field in User::hidden_fields() {
                map.remove(*field);
            }
        }
        value
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| {
                u.password_reset_token.as_deref() == Some(token_hash)
                    && u.password_reset_expires.map(|e| e > now).unwrap_or(false)
            })
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        user.validate()?;
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Duplicate {
                field: "email".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        user.validate()?;
        self.save_unchecked(user).await
    }

    async fn save_unchecked(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::not_found("User"));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl Repository<User> for MockUserRepository {
    async fn get_all(&self, options: &QueryOptions) -> DomainResult<Vec<Value>> {
        let users = self.users.read().await;
        let mut docs: Vec<(Uuid, Value)> = users
            .values()
            .filter_map(|u| {
                let full = serde_json::to_value(u).ok()?;
                options.filter.matches(&full).then(|| (u.id, Self::to_output(u)))
            })
            .collect();
        docs.sort_by_key(|(id, _)| *id);

        Ok(docs
            .into_iter()
            .skip(options.page.skip())
            .take(options.page.limit())
            .map(|(_, doc)| doc)
            .collect())
    }

    async fn get_one_by_id(&self, id: Uuid, _populate: &[String]) -> DomainResult<Option<Value>> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(Self::to_output))
    }

    async fn create_one(&self, doc: User) -> DomainResult<Value> {
        let created = UserRepository::create(self, doc).await?;
        Ok(Self::to_output(&created))
    }

    async fn update_one_by_id(
        &self,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> DomainResult<Option<Value>> {
        let mut users = self.users.write().await;

        let Some(existing) = users.get(&id) else {
            return Ok(None);
        };

        let mut merged = serde_json::to_value(existing).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize user: {}", e),
        })?;
        if let Value::Object(ref mut map) = merged {
            for (key, value) in fields {
                map.insert(key, value);
            }
        }

        let updated: User =
            serde_json::from_value(merged).map_err(|e| DomainError::validation(e.to_string()))?;
        updated.validate()?;

        users.insert(id, updated.clone());
        Ok(Some(Self::to_output(&updated)))
    }

    async fn delete_one_by_id(&self, id: Uuid) -> DomainResult<()> {
        let mut users = self.users.write().await;
        users.remove(&id);
        Ok(())
    }

    async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        let users = self.users.read().await;
        let count = users
            .values()
            .filter(|u| {
                serde_json::to_value(u)
                    .map(|v| filter.matches(&v))
                    .unwrap_or(false)
            })
            .count();
        Ok(count as u64)
    }

    async fn is_exist(&self, id: Uuid) -> DomainResult<bool> {
        // Full fetch and boolean cast, as documented.
        Ok(self.get_one_by_id(id, &[]).await?.is_some())
    }
}
