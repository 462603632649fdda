use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::rock_type::SEED_LABELS;
use crate::database::models::{DeleteOutcome, NewRock, NewUser, RockRecord, RockType, User};
use crate::database::store::{RecordStore, StoreError};

#[derive(Debug, Clone)]
struct RockRow {
    id: i64,
    name: String,
    weight: f64,
    type_id: i64,
    user_id: i64,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    types: BTreeMap<i64, RockType>,
    rocks: BTreeMap<i64, RockRow>,
    next_user_id: i64,
    next_rock_id: i64,
}

impl Tables {
    fn join(&self, row: &RockRow) -> Result<RockRecord, StoreError> {
        let user = self
            .users
            .get(&row.user_id)
            .ok_or_else(|| StoreError::Internal(format!("rock {} references missing user {}", row.id, row.user_id)))?;
        let rock_type = self
            .types
            .get(&row.type_id)
            .ok_or_else(|| StoreError::Internal(format!("rock {} references missing type {}", row.id, row.type_id)))?;

        Ok(RockRecord {
            id: row.id,
            name: row.name.clone(),
            weight: row.weight,
            user_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            type_id: rock_type.id,
            type_label: rock_type.label.clone(),
        })
    }
}

/// In-process record store used by tests and `--store memory` runs.
///
/// Ids are assigned sequentially from 1 like a fresh `BIGSERIAL`. Each
/// operation holds the table lock for its whole duration.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store with the standard rock types seeded
    pub fn new() -> Self {
        Self::with_types(SEED_LABELS)
    }

    pub fn with_types<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types = labels
            .into_iter()
            .zip(1..)
            .map(|(label, id)| (id, RockType { id, label: label.into() }))
            .collect();

        Self {
            tables: RwLock::new(Tables {
                types,
                next_user_id: 1,
                next_rock_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!("username '{}' is already taken", user.username)));
        }

        let id = tables.next_user_id;
        tables.next_user_id += 1;

        let created = User {
            id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_types(&self) -> Result<Vec<RockType>, StoreError> {
        Ok(self.tables.read().await.types.values().cloned().collect())
    }

    async fn find_type(&self, id: i64) -> Result<Option<RockType>, StoreError> {
        Ok(self.tables.read().await.types.get(&id).cloned())
    }

    async fn insert_rock(&self, rock: NewRock) -> Result<Option<RockRecord>, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.types.contains_key(&rock.type_id) {
            return Ok(None);
        }
        if !tables.users.contains_key(&rock.user_id) {
            return Err(StoreError::Internal(format!("owner {} does not exist", rock.user_id)));
        }

        let id = tables.next_rock_id;
        tables.next_rock_id += 1;

        let row = RockRow {
            id,
            name: rock.name,
            weight: rock.weight,
            type_id: rock.type_id,
            user_id: rock.user_id,
        };
        let record = tables.join(&row)?;
        tables.rocks.insert(id, row);
        Ok(Some(record))
    }

    async fn list_rocks(&self, owner: Option<i64>) -> Result<Vec<RockRecord>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .rocks
            .values()
            .filter(|row| owner.map_or(true, |o| row.user_id == o))
            .map(|row| tables.join(row))
            .collect()
    }

    async fn find_rock(&self, id: i64) -> Result<Option<RockRecord>, StoreError> {
        let tables = self.tables.read().await;
        tables.rocks.get(&id).map(|row| tables.join(row)).transpose()
    }

    async fn delete_rock_owned(&self, id: i64, owner: i64) -> Result<DeleteOutcome, StoreError> {
        let mut tables = self.tables.write().await;

        let outcome = match tables.rocks.get(&id) {
            None => DeleteOutcome::Missing,
            Some(row) if row.user_id != owner => DeleteOutcome::NotOwned,
            Some(_) => {
                tables.rocks.remove(&id);
                DeleteOutcome::Deleted
            }
        };
        Ok(outcome)
    }
}
