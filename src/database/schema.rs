// Idempotent DDL run at startup and by `rock-api migrate`
use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::rock_type::SEED_LABELS;

const DDL: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rock_types (
        id BIGSERIAL PRIMARY KEY,
        label TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rocks (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        weight DOUBLE PRECISION NOT NULL,
        type_id BIGINT NOT NULL REFERENCES rock_types(id),
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
];

/// Create tables and seed the rock types
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    for ddl in DDL {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    for label in SEED_LABELS {
        sqlx::query("INSERT INTO rock_types (label) VALUES ($1) ON CONFLICT (label) DO NOTHING")
            .bind(label)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("Schema ready ({} tables, {} rock types)", DDL.len(), SEED_LABELS.len());
    Ok(())
}
