use sqlx::FromRow;

/// A rock row joined with its owner's names and its type label
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RockRecord {
    pub id: i64,
    pub name: String,
    pub weight: f64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub type_id: i64,
    pub type_label: String,
}

#[derive(Debug, Clone)]
pub struct NewRock {
    pub name: String,
    pub weight: f64,
    pub type_id: i64,
    pub user_id: i64,
}

/// Result of a delete restricted to the caller's own rocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The rock exists and belongs to another user; nothing was removed
    NotOwned,
    Missing,
}
