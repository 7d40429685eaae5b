//! Zone Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Zone entity (salle, terrasse, bar...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Zone {
    pub id: i64,
    pub establishment_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Hex color used on the floor plan
    pub color: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create zone payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZoneCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 20))]
    pub color: Option<String>,
    pub display_order: Option<i32>,
}

/// Update zone payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ZoneUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 20))]
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
