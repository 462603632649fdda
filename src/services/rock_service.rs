use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::api::format::RockView;
use crate::database::models::{DeleteOutcome, NewRock};
use crate::database::{RecordStore, StoreError};
use crate::middleware::AuthUser;

pub const TYPE_NOT_FOUND: &str = "Type not found";
pub const ROCK_NOT_FOUND: &str = "Rock not found";
pub const NOT_OWNER: &str = "You do not own that rock";

#[derive(Debug, Error)]
pub enum RockError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRock {
    pub type_id: i64,
    pub weight: f64,
    pub name: String,
}

/// Which rocks a list call returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    /// Only rocks owned by the caller
    Owned,
}

impl ListScope {
    /// `?owner=current` narrows to the caller; any other value lists everything
    pub fn from_owner_param(owner: Option<&str>) -> Self {
        match owner {
            Some("current") => ListScope::Owned,
            _ => ListScope::All,
        }
    }
}

/// Create, list and delete over the caller's rocks
pub struct RockService {
    store: Arc<dyn RecordStore>,
}

impl RockService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Persist a new rock owned by `caller`
    pub async fn create(&self, input: CreateRock, caller: &AuthUser) -> Result<RockView, RockError> {
        let new_rock = NewRock {
            name: input.name,
            weight: input.weight,
            type_id: input.type_id,
            user_id: caller.id,
        };

        let record = self
            .store
            .insert_rock(new_rock)
            .await?
            .ok_or_else(|| RockError::NotFound(TYPE_NOT_FOUND.to_string()))?;

        tracing::info!("User {} created rock {} ({})", caller.id, record.id, record.name);
        Ok(record.into())
    }

    pub async fn list(&self, scope: ListScope, caller: &AuthUser) -> Result<Vec<RockView>, RockError> {
        let owner = match scope {
            ListScope::All => None,
            ListScope::Owned => Some(caller.id),
        };

        let records = self.store.list_rocks(owner).await?;
        Ok(records.into_iter().map(RockView::from).collect())
    }

    /// Delete rock `id` if `caller` owns it
    pub async fn destroy(&self, id: i64, caller: &AuthUser) -> Result<(), RockError> {
        match self.store.delete_rock_owned(id, caller.id).await? {
            DeleteOutcome::Deleted => {
                tracing::info!("User {} deleted rock {}", caller.id, id);
                Ok(())
            }
            DeleteOutcome::NotOwned => {
                tracing::warn!("User {} tried to delete rock {} owned by someone else", caller.id, id);
                Err(RockError::Forbidden(NOT_OWNER.to_string()))
            }
            DeleteOutcome::Missing => Err(RockError::NotFound(ROCK_NOT_FOUND.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, RockService, AuthUser, AuthUser) {
        let store = Arc::new(MemoryStore::new());
        let mut callers = Vec::new();
        for (username, first) in [("a", "A"), ("b", "B")] {
            let user = store
                .create_user(NewUser {
                    username: username.to_string(),
                    first_name: first.to_string(),
                    last_name: "Stone".to_string(),
                    password_hash: "x$y".to_string(),
                })
                .await
                .unwrap();
            callers.push(AuthUser {
                id: user.id,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
            });
        }
        let b = callers.pop().unwrap();
        let a = callers.pop().unwrap();
        (store.clone(), RockService::new(store), a, b)
    }

    fn obsidian() -> CreateRock {
        CreateRock {
            type_id: 1,
            weight: 5.0,
            name: "Obsidian".to_string(),
        }
    }

    #[test]
    fn owner_param_selects_scope() {
        assert_eq!(ListScope::from_owner_param(Some("current")), ListScope::Owned);
        assert_eq!(ListScope::from_owner_param(Some("everyone")), ListScope::All);
        assert_eq!(ListScope::from_owner_param(Some("")), ListScope::All);
        assert_eq!(ListScope::from_owner_param(None), ListScope::All);
    }

    #[tokio::test]
    async fn create_binds_caller_and_type() {
        let (_, service, a, _) = setup().await;
        let rock = service.create(obsidian(), &a).await.unwrap();

        assert_eq!(rock.id, 1);
        assert_eq!(rock.name, "Obsidian");
        assert_eq!(rock.weight, 5.0);
        assert_eq!(rock.user.first_name, "A");
        assert_eq!(rock.rock_type.label, "Igneous");
    }

    #[tokio::test]
    async fn create_with_unknown_type_is_not_found() {
        let (_, service, a, _) = setup().await;
        let input = CreateRock { type_id: 404, ..obsidian() };

        let err = service.create(input, &a).await.unwrap_err();
        assert!(matches!(err, RockError::NotFound(ref msg) if msg == TYPE_NOT_FOUND));
    }

    #[tokio::test]
    async fn list_scopes_to_caller_on_request() {
        let (_, service, a, b) = setup().await;
        service.create(obsidian(), &a).await.unwrap();
        service.create(CreateRock { name: "Shale".to_string(), type_id: 2, ..obsidian() }, &b).await.unwrap();
        service.create(CreateRock { name: "Marble".to_string(), type_id: 3, ..obsidian() }, &a).await.unwrap();

        let all = service.list(ListScope::All, &b).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let owned = service.list(ListScope::Owned, &a).await.unwrap();
        assert_eq!(owned.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Obsidian", "Marble"]);
        assert!(owned.iter().all(|r| r.user.first_name == "A"));
    }

    #[tokio::test]
    async fn destroy_by_non_owner_is_forbidden_and_keeps_record() {
        let (store, service, a, b) = setup().await;
        let rock = service.create(obsidian(), &a).await.unwrap();

        let err = service.destroy(rock.id, &b).await.unwrap_err();
        assert!(matches!(err, RockError::Forbidden(ref msg) if msg == NOT_OWNER));
        assert!(store.find_rock(rock.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn destroy_by_owner_removes_record() {
        let (store, service, a, b) = setup().await;
        let rock = service.create(obsidian(), &a).await.unwrap();

        service.destroy(rock.id, &a).await.unwrap();
        assert!(store.find_rock(rock.id).await.unwrap().is_none());

        for caller in [&a, &b] {
            let err = service.destroy(rock.id, caller).await.unwrap_err();
            assert!(matches!(err, RockError::NotFound(ref msg) if msg == ROCK_NOT_FOUND));
        }
    }
}
