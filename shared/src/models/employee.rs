//! Employee Model

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::role::Role;

/// Employee (without password or PIN hashes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub establishment_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    /// Route whitelist; `None` means the role rules apply
    pub allowed_routes: Option<Vec<String>>,
    pub has_pin: bool,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(length(min = 2, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 4, max = 8))]
    pub pin: Option<String>,
    pub role: Role,
    pub allowed_routes: Option<Vec<String>>,
}

/// Update employee payload
///
/// `allowed_routes` distinguishes absent (unchanged), `null` (remove the
/// whitelist) and an array (replace it).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    #[validate(length(min = 4, max = 8))]
    pub pin: Option<String>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    pub allowed_routes: Option<Option<Vec<String>>>,
    pub is_active: Option<bool>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
