//! Client-facing API DTOs
//!
//! Request/response types used by the web client for auth and route access.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Permission, Role};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Password login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// PIN login request (quick switch on the till)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PinLoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 4, max = 8))]
    pub pin: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub establishment_id: i64,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub allowed_routes: Option<Vec<String>>,
}

// =============================================================================
// Route access DTOs
// =============================================================================

/// Route access decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAccess {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RouteAccess {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// `GET /api/access/check` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCheckQuery {
    pub path: String,
}
