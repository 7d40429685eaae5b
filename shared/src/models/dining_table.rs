//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Table status on the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableStatus {
    Free,
    Occupied,
    InPreparation,
    BillRequested,
    NeedsCleaning,
}

impl TableStatus {
    /// Statuses that are only valid while no order is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, TableStatus::Free | TableStatus::NeedsCleaning)
    }
}

/// Table shape (plan de salle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableShape {
    #[default]
    Square,
    Round,
    Rectangle,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub establishment_id: i64,
    pub zone_id: Option<i64>,
    /// Alphanumeric label shown to staff ("12", "T4", "Bar 2")
    pub number: String,
    pub capacity: i32,
    pub shape: TableShape,
    pub position_x: f64,
    pub position_y: f64,
    pub status: TableStatus,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    pub zone_id: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    pub shape: Option<TableShape>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(length(min = 1, max = 20))]
    pub number: Option<String>,
    pub zone_id: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    pub shape: Option<TableShape>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub is_active: Option<bool>,
}

/// Manual status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}

/// Table list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableQuery {
    pub zone_id: Option<i64>,
}
