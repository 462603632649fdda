use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{DeleteOutcome, NewRock, NewUser, RockRecord, RockType, User};
use crate::database::store::{RecordStore, StoreError};

const USER_COLUMNS: &str = "id, username, first_name, last_name, password_hash, created_at";

const ROCK_SELECT: &str = r#"
    SELECT r.id, r.name, r.weight, r.user_id, u.first_name, u.last_name,
           r.type_id, t.label AS type_label
    FROM rocks r
    JOIN users u ON u.id = r.user_id
    JOIN rock_types t ON t.id = r.type_id
"#;

// The type check is the INSERT's own SELECT, so a missing type inserts nothing.
const ROCK_INSERT: &str = r#"
    WITH inserted AS (
        INSERT INTO rocks (name, weight, type_id, user_id)
        SELECT $1::TEXT, $2::DOUBLE PRECISION, t.id, $4::BIGINT
        FROM rock_types t WHERE t.id = $3
        RETURNING id, name, weight, type_id, user_id
    )
    SELECT i.id, i.name, i.weight, i.user_id, u.first_name, u.last_name,
           i.type_id, t.label AS type_label
    FROM inserted i
    JOIN users u ON u.id = i.user_id
    JOIN rock_types t ON t.id = i.type_id
"#;

// Deletes only when the owner matches and reports who owned the row.
const ROCK_DELETE_OWNED: &str = r#"
    WITH target AS (
        SELECT id, user_id FROM rocks WHERE id = $1
    ),
    removed AS (
        DELETE FROM rocks r USING target t
        WHERE r.id = t.id AND t.user_id = $2
        RETURNING r.id
    )
    SELECT (SELECT user_id FROM target) AS owner_id,
           EXISTS (SELECT 1 FROM removed) AS deleted
"#;

/// PostgreSQL-backed record store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, first_name, last_name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("username '{}' is already taken", user.username))
                }
                other => StoreError::Sqlx(other),
            })
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_types(&self) -> Result<Vec<RockType>, StoreError> {
        let types = sqlx::query_as::<_, RockType>("SELECT id, label FROM rock_types ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(types)
    }

    async fn find_type(&self, id: i64) -> Result<Option<RockType>, StoreError> {
        let rock_type = sqlx::query_as::<_, RockType>("SELECT id, label FROM rock_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rock_type)
    }

    async fn insert_rock(&self, rock: NewRock) -> Result<Option<RockRecord>, StoreError> {
        let record = sqlx::query_as::<_, RockRecord>(ROCK_INSERT)
            .bind(&rock.name)
            .bind(rock.weight)
            .bind(rock.type_id)
            .bind(rock.user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_rocks(&self, owner: Option<i64>) -> Result<Vec<RockRecord>, StoreError> {
        let sql = format!(
            "{} WHERE ($1::BIGINT IS NULL OR r.user_id = $1) ORDER BY r.id",
            ROCK_SELECT
        );
        let rocks = sqlx::query_as::<_, RockRecord>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rocks)
    }

    async fn find_rock(&self, id: i64) -> Result<Option<RockRecord>, StoreError> {
        let sql = format!("{} WHERE r.id = $1", ROCK_SELECT);
        let rock = sqlx::query_as::<_, RockRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rock)
    }

    async fn delete_rock_owned(&self, id: i64, owner: i64) -> Result<DeleteOutcome, StoreError> {
        let (owner_id, deleted): (Option<i64>, bool) = sqlx::query_as(ROCK_DELETE_OWNED)
            .bind(id)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(classify_delete(owner_id, deleted, owner))
    }
}

fn classify_delete(owner_id: Option<i64>, deleted: bool, caller: i64) -> DeleteOutcome {
    match (owner_id, deleted) {
        (_, true) => DeleteOutcome::Deleted,
        (None, false) => DeleteOutcome::Missing,
        // Owned by the caller but removed by a concurrent request
        (Some(id), false) if id == caller => DeleteOutcome::Missing,
        (Some(_), false) => DeleteOutcome::NotOwned,
    }
}
