// Wire representations of stored records
use serde::Serialize;

use crate::database::models::{RockRecord, RockType};

/// `{ id, name, weight, user: {first_name, last_name}, type: {label} }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RockView {
    pub id: i64,
    pub name: String,
    pub weight: f64,
    pub user: OwnerView,
    #[serde(rename = "type")]
    pub rock_type: TypeView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerView {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeView {
    pub label: String,
}

/// Full type entry for the `/types` listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeEntry {
    pub id: i64,
    pub label: String,
}

impl From<RockRecord> for RockView {
    fn from(record: RockRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            weight: record.weight,
            user: OwnerView {
                first_name: record.first_name,
                last_name: record.last_name,
            },
            rock_type: TypeView {
                label: record.type_label,
            },
        }
    }
}

impl From<RockType> for TypeEntry {
    fn from(rock_type: RockType) -> Self {
        Self {
            id: rock_type.id,
            label: rock_type.label,
        }
    }
}
