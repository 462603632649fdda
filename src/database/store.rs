use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{DeleteOutcome, NewRock, NewUser, RockRecord, RockType, User};

/// Errors raised by record store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Internal(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence port for users, rock types and rocks.
///
/// Every method is a single store operation. Implementations must make
/// `insert_rock` and `delete_rock_owned` atomic: the type check happens in
/// the same step as the insert, and the ownership check in the same step as
/// the delete.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a user. A duplicate username yields `StoreError::Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn list_types(&self) -> Result<Vec<RockType>, StoreError>;

    async fn find_type(&self, id: i64) -> Result<Option<RockType>, StoreError>;

    /// Insert a rock bound to `rock.type_id`. Returns `None` when that type
    /// does not exist; nothing is written in that case.
    async fn insert_rock(&self, rock: NewRock) -> Result<Option<RockRecord>, StoreError>;

    /// All rocks ordered by id, optionally narrowed to one owner.
    async fn list_rocks(&self, owner: Option<i64>) -> Result<Vec<RockRecord>, StoreError>;

    async fn find_rock(&self, id: i64) -> Result<Option<RockRecord>, StoreError>;

    /// Delete rock `id` only if `owner` owns it.
    async fn delete_rock_owned(&self, id: i64, owner: i64) -> Result<DeleteOutcome, StoreError>;
}
