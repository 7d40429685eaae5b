//! Establishment Model

use serde::{Deserialize, Serialize};

/// Establishment entity (établissement), the tenant boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Establishment {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}
