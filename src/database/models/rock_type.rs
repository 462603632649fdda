use serde::Serialize;
use sqlx::FromRow;

/// Reference data classifying a rock
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RockType {
    pub id: i64,
    pub label: String,
}

/// Labels seeded by the schema bootstrap, in id order
pub const SEED_LABELS: [&str; 3] = ["Igneous", "Sedimentary", "Metamorphic"];
