//! Role Model
//!
//! Five fixed roles in a strict hierarchy:
//! `SUPER_ADMIN > ADMIN > MANAGER > CAISSIER > SERVEUR`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::permission::Permission;

/// Employee role (rôle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Caissier,
    Serveur,
}

impl Role {
    /// All roles, highest rank first
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Caissier,
        Role::Serveur,
    ];

    /// Numeric rank used for hierarchy comparisons
    pub const fn level(&self) -> u8 {
        match self {
            Role::SuperAdmin => 100,
            Role::Admin => 80,
            Role::Manager => 60,
            Role::Caissier => 40,
            Role::Serveur => 20,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Caissier => "CAISSIER",
            Role::Serveur => "SERVEUR",
        }
    }

    /// `self` ranks at least as high as `other`
    pub fn is_at_least(&self, other: Role) -> bool {
        self.level() >= other.level()
    }

    /// `self` ranks strictly above `other`
    pub fn is_above(&self, other: Role) -> bool {
        self.level() > other.level()
    }

    /// A manager may administer only strictly lower roles
    pub fn can_manage(&self, target: Role) -> bool {
        self.is_above(target)
    }

    /// Administrative roles bypass route permission checks
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Effective permission set of a role within an establishment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: Role,
    pub level: u8,
    pub permissions: Vec<Permission>,
    /// `true` when no establishment override is stored
    pub is_default: bool,
}

/// Replace a role's permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissionsUpdate {
    /// Permission strings (`entite:action`); unknown strings are rejected
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(Role::SuperAdmin.is_above(Role::Admin));
        assert!(Role::Manager.is_at_least(Role::Manager));
        assert!(!Role::Manager.is_above(Role::Manager));
        assert!(Role::Caissier.is_above(Role::Serveur));
        assert!(!Role::Serveur.is_at_least(Role::Caissier));
    }

    #[test]
    fn test_can_manage_only_lower_roles() {
        assert!(Role::Manager.can_manage(Role::Caissier));
        assert!(!Role::Manager.can_manage(Role::Manager));
        assert!(!Role::Admin.can_manage(Role::SuperAdmin));
        assert!(Role::SuperAdmin.can_manage(Role::Admin));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("CAISSIER".parse::<Role>(), Ok(Role::Caissier));
        assert_eq!("super_admin".parse::<Role>(), Ok(Role::SuperAdmin));
        assert!("CHEF".parse::<Role>().is_err());
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"SUPER_ADMIN\""
        );
    }
}
