//! Permission Definitions
//!
//! Static role → permission matrix, role hierarchy helpers, and the
//! per-establishment overrides stored in `permissions_roles`.
//!
//! ## 规则
//! - `SUPER_ADMIN` 拥有全部权限，且不可被覆盖
//! - 其他角色的默认权限可按门店覆盖 (整组替换，不做合并)
//! - 登录时解析有效权限并写入 JWT

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use shared::models::{Permission, Role, RolePermissions};
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, role_permission};
use crate::utils::{AppError, ErrorCode};

use Permission::*;

/// 收银员默认权限
const CAISSIER_PERMISSIONS: &[Permission] = &[
    ProduitVoir,
    CategorieVoir,
    VenteVoir,
    VenteCreer,
    VenteModifier,
    TableVoir,
    TableTransferer,
    ZoneVoir,
    SessionVoir,
    SessionOuvrir,
    SessionFermer,
    CaisseOuvrirTiroir,
    PaiementEncaisser,
    ClientVoir,
    ClientCreer,
    ClientFidelite,
    StockVoir,
];

/// 服务员默认权限
const SERVEUR_PERMISSIONS: &[Permission] = &[
    ProduitVoir,
    CategorieVoir,
    VenteVoir,
    VenteCreer,
    VenteModifier,
    TableVoir,
    TableTransferer,
    ZoneVoir,
    ClientVoir,
];

/// Withheld from ADMIN
const ADMIN_EXCLUDED: &[Permission] = &[EtablissementModifier];

/// Withheld from MANAGER
const MANAGER_EXCLUDED: &[Permission] = &[
    UtilisateurSupprimer,
    RoleGerer,
    EtablissementModifier,
    ParametresModifier,
];

static DEFAULT_MATRIX: LazyLock<HashMap<Role, BTreeSet<Permission>>> = LazyLock::new(|| {
    let all_except = |excluded: &[Permission]| -> BTreeSet<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| !excluded.contains(p))
            .collect()
    };

    HashMap::from([
        (Role::SuperAdmin, all_except(&[])),
        (Role::Admin, all_except(ADMIN_EXCLUDED)),
        (Role::Manager, all_except(MANAGER_EXCLUDED)),
        (Role::Caissier, CAISSIER_PERMISSIONS.iter().copied().collect()),
        (Role::Serveur, SERVEUR_PERMISSIONS.iter().copied().collect()),
    ])
});

/// Default permission set of a role
pub fn default_permissions(role: Role) -> &'static BTreeSet<Permission> {
    // 所有角色都在表中
    &DEFAULT_MATRIX[&role]
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    default_permissions(role).contains(&permission)
}

pub fn has_all_permissions(role: Role, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(role, *p))
}

pub fn has_any_permission(role: Role, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(role, *p))
}

pub fn is_role_at_least(role: Role, min_role: Role) -> bool {
    role.is_at_least(min_role)
}

pub fn is_role_above(role: Role, other: Role) -> bool {
    role.is_above(other)
}

/// 管理者只能管理级别严格更低的角色
pub fn can_manage_user(manager: Role, target: Role) -> bool {
    manager.can_manage(target)
}

/// Parse permission strings from an API payload
///
/// Unknown strings are rejected; duplicates collapse.
pub fn parse_permissions(raw: &[String]) -> Result<BTreeSet<Permission>, AppError> {
    raw.iter()
        .map(|s| {
            s.parse::<Permission>().map_err(|e| {
                AppError::with_message(ErrorCode::PermissionUnknown, e.to_string())
                    .with_detail("permission", s.as_str())
            })
        })
        .collect()
}

/// Role matrix of one establishment: defaults plus stored overrides
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    overrides: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionMatrix {
    pub fn defaults() -> Self {
        Self::default()
    }

    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (Role, BTreeSet<Permission>)>,
    ) -> Self {
        let mut matrix = Self::default();
        for (role, permissions) in overrides {
            // 数据库里的 SUPER_ADMIN 覆盖不生效
            if role != Role::SuperAdmin {
                matrix.overrides.insert(role, permissions);
            }
        }
        matrix
    }

    /// Effective permission set of `role`
    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        self.overrides
            .get(&role)
            .unwrap_or_else(|| default_permissions(role))
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }

    pub fn is_default(&self, role: Role) -> bool {
        !self.overrides.contains_key(&role)
    }

    /// Replace the permission set of `role`
    pub fn set_override(
        &mut self,
        role: Role,
        permissions: BTreeSet<Permission>,
    ) -> Result<(), AppError> {
        if role == Role::SuperAdmin {
            return Err(AppError::new(ErrorCode::RoleImmutable).with_detail("role", role.as_str()));
        }
        self.overrides.insert(role, permissions);
        Ok(())
    }

    pub fn clear_override(&mut self, role: Role) {
        self.overrides.remove(&role);
    }

    pub fn describe_role(&self, role: Role) -> RolePermissions {
        RolePermissions {
            role,
            level: role.level(),
            permissions: self.permissions_for(role).iter().copied().collect(),
            is_default: self.is_default(role),
        }
    }

    /// Snapshot for the roles API, highest rank first
    pub fn describe(&self) -> Vec<RolePermissions> {
        Role::ALL
            .into_iter()
            .map(|role| self.describe_role(role))
            .collect()
    }
}

/// 门店权限矩阵缓存 (DashMap 无锁并发)
///
/// Loaded lazily from `permissions_roles`; invalidated whenever an
/// override is written or removed.
#[derive(Debug, Default)]
pub struct PermissionCache {
    matrices: DashMap<i64, Arc<PermissionMatrix>>,
}

impl PermissionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load(
        &self,
        pool: &SqlitePool,
        establishment_id: i64,
    ) -> RepoResult<Arc<PermissionMatrix>> {
        if let Some(matrix) = self.matrices.get(&establishment_id) {
            return Ok(matrix.clone());
        }

        let overrides = role_permission::find_overrides(pool, establishment_id).await?;
        let matrix = Arc::new(PermissionMatrix::with_overrides(overrides));
        self.matrices.insert(establishment_id, matrix.clone());
        tracing::debug!(establishment_id, "Permission matrix loaded");
        Ok(matrix)
    }

    pub fn invalidate(&self, establishment_id: i64) {
        self.matrices.remove(&establishment_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_has_everything() {
        assert_eq!(default_permissions(Role::SuperAdmin).len(), 47);
        assert!(has_all_permissions(Role::SuperAdmin, Permission::ALL));
    }

    #[test]
    fn test_admin_and_manager_exclusions() {
        assert_eq!(default_permissions(Role::Admin).len(), 46);
        assert!(!has_permission(Role::Admin, EtablissementModifier));
        assert!(has_permission(Role::Admin, RoleGerer));

        assert_eq!(default_permissions(Role::Manager).len(), 43);
        assert!(!has_permission(Role::Manager, RoleGerer));
        assert!(!has_permission(Role::Manager, ParametresModifier));
        assert!(has_permission(Role::Manager, ParametresVoir));
        assert!(has_permission(Role::Manager, UtilisateurCreer));
    }

    #[test]
    fn test_floor_roles() {
        assert_eq!(default_permissions(Role::Caissier).len(), 17);
        assert_eq!(default_permissions(Role::Serveur).len(), 9);
        assert!(has_permission(Role::Serveur, TableTransferer));
        assert!(!has_permission(Role::Serveur, PaiementEncaisser));
        assert!(has_any_permission(Role::Serveur, &[PaiementEncaisser, VenteCreer]));
        assert!(!has_any_permission(Role::Serveur, &[PaiementEncaisser, StockVoir]));
        assert!(has_all_permissions(Role::Caissier, &[VenteCreer, PaiementEncaisser]));
    }

    #[test]
    fn test_hierarchy_helpers() {
        assert!(is_role_at_least(Role::Manager, Role::Manager));
        assert!(!is_role_above(Role::Manager, Role::Manager));
        assert!(can_manage_user(Role::Manager, Role::Serveur));
        assert!(!can_manage_user(Role::Caissier, Role::Caissier));
    }

    #[test]
    fn test_matrix_override_replaces_set() {
        let mut matrix = PermissionMatrix::defaults();
        assert!(matrix.is_default(Role::Serveur));

        matrix
            .set_override(Role::Serveur, BTreeSet::from([TableVoir]))
            .unwrap();
        assert!(!matrix.is_default(Role::Serveur));
        assert!(matrix.has_permission(Role::Serveur, TableVoir));
        assert!(!matrix.has_permission(Role::Serveur, VenteCreer));

        matrix.clear_override(Role::Serveur);
        assert!(matrix.has_permission(Role::Serveur, VenteCreer));
    }

    #[test]
    fn test_super_admin_is_immutable() {
        let mut matrix = PermissionMatrix::defaults();
        let err = matrix
            .set_override(Role::SuperAdmin, BTreeSet::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleImmutable);

        let loaded = PermissionMatrix::with_overrides([(Role::SuperAdmin, BTreeSet::new())]);
        assert_eq!(loaded.permissions_for(Role::SuperAdmin).len(), 47);
    }

    #[test]
    fn test_empty_override_is_kept() {
        let matrix = PermissionMatrix::with_overrides([(Role::Caissier, BTreeSet::new())]);
        assert!(matrix.permissions_for(Role::Caissier).is_empty());
        assert!(!matrix.is_default(Role::Caissier));
    }

    #[test]
    fn test_parse_permissions_rejects_unknown() {
        let ok = parse_permissions(&["table:voir".into(), "table:voir".into()]).unwrap();
        assert_eq!(ok.len(), 1);

        let err = parse_permissions(&["table:danser".into()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionUnknown);
    }
}
