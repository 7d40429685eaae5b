//! Route authorization
//!
//! Decides whether a user may open a UI route. First matching rule wins:
//!
//! 1. no user → deny
//! 2. `SUPER_ADMIN` / `ADMIN` → allow
//! 3. user whitelist (`allowed_routes`) present → allow iff a prefix
//!    matches; role permissions are not consulted
//! 4. static route rule (exact, else nearest parent):
//!    no rule → allow; public → allow; then allowed roles, minimum role,
//!    AND-permissions, OR-permissions in that order

use shared::client::RouteAccess;

use super::CurrentUser;
use super::routes::{ROUTES, find_route_config, route_matches_prefix};

pub fn can_access_route(user: Option<&CurrentUser>, path: &str) -> RouteAccess {
    let Some(user) = user else {
        return RouteAccess::deny("Utilisateur non authentifié");
    };

    if user.is_admin() {
        return RouteAccess::allow();
    }

    if let Some(allowed_routes) = &user.allowed_routes {
        if allowed_routes.is_empty() {
            return RouteAccess::deny("Aucune route autorisée pour cet utilisateur");
        }
        return if allowed_routes
            .iter()
            .any(|entry| route_matches_prefix(path, entry))
        {
            RouteAccess::allow()
        } else {
            RouteAccess::deny("Route non autorisée pour cet utilisateur")
        };
    }

    let Some(rule) = find_route_config(path) else {
        return RouteAccess::allow();
    };

    if rule.public_for_authenticated {
        return RouteAccess::allow();
    }

    if let Some(roles) = rule.allowed_roles
        && !roles.contains(&user.role)
    {
        return RouteAccess::deny(format!("Rôle {} non autorisé", user.role));
    }

    if let Some(min_role) = rule.min_role
        && !user.role.is_at_least(min_role)
    {
        return RouteAccess::deny(format!("Rôle minimum requis : {min_role}"));
    }

    if let Some(required) = rule.required_all_permissions
        && !user.has_all_permissions(required)
    {
        return RouteAccess::deny(format!(
            "Permissions requises : {}",
            join_permissions(required)
        ));
    }

    if let Some(required) = rule.required_permissions
        && !user.has_any_permission(required)
    {
        return RouteAccess::deny(format!(
            "Une de ces permissions est requise : {}",
            join_permissions(required)
        ));
    }

    RouteAccess::allow()
}

/// Configured routes the user may open, in configuration order
pub fn accessible_routes(user: &CurrentUser) -> Vec<&'static str> {
    ROUTES
        .iter()
        .filter(|rule| can_access_route(Some(user), rule.path).allowed)
        .map(|rule| rule.path)
        .collect()
}

fn join_permissions(permissions: &[shared::models::Permission]) -> String {
    permissions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::default_permissions;
    use shared::models::{Permission, Role};

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "u".into(),
            display_name: "U".into(),
            role,
            establishment_id: 1,
            permissions: default_permissions(role).iter().copied().collect(),
            allowed_routes: None,
        }
    }

    #[test]
    fn test_anonymous_is_denied() {
        let access = can_access_route(None, "/dashboard");
        assert!(!access.allowed);
        assert!(access.reason.is_some());
    }

    #[test]
    fn test_admins_allowed_everywhere() {
        for role in [Role::SuperAdmin, Role::Admin] {
            let mut u = user(role);
            u.permissions.clear();
            u.allowed_routes = Some(vec![]);
            assert!(can_access_route(Some(&u), "/etablissement").allowed);
            assert!(can_access_route(Some(&u), "/nimporte/quoi").allowed);
        }
    }

    #[test]
    fn test_empty_whitelist_denies_everything() {
        let mut u = user(Role::Manager);
        u.allowed_routes = Some(vec![]);
        assert!(!can_access_route(Some(&u), "/dashboard").allowed);
        assert!(!can_access_route(Some(&u), "/inconnue").allowed);
    }

    #[test]
    fn test_whitelist_bypasses_role_rules() {
        let mut u = user(Role::Serveur);
        u.allowed_routes = Some(vec!["/rapports".into()]);
        assert!(can_access_route(Some(&u), "/rapports").allowed);
        assert!(can_access_route(Some(&u), "/rapports/jour").allowed);
        assert!(!can_access_route(Some(&u), "/tables").allowed);
        assert!(!can_access_route(Some(&u), "/rapportsx").allowed);
    }

    #[test]
    fn test_unconfigured_and_public_routes() {
        let mut u = user(Role::Serveur);
        u.permissions.clear();
        assert!(can_access_route(Some(&u), "/aide").allowed);
        assert!(can_access_route(Some(&u), "/dashboard").allowed);
        assert!(can_access_route(Some(&u), "/profil/securite").allowed);
    }

    #[test]
    fn test_allowed_roles() {
        assert!(!can_access_route(Some(&user(Role::Manager)), "/permissions").allowed);
        assert!(!can_access_route(Some(&user(Role::Manager)), "/etablissement").allowed);
    }

    #[test]
    fn test_min_role_checked_before_permissions() {
        let mut caissier = user(Role::Caissier);
        caissier.permissions.push(Permission::RapportVoir);
        let access = can_access_route(Some(&caissier), "/rapports");
        assert!(!access.allowed);
        assert!(access.reason.unwrap().contains("MANAGER"));

        assert!(can_access_route(Some(&user(Role::Manager)), "/rapports").allowed);
    }

    #[test]
    fn test_all_and_any_permissions() {
        let serveur = user(Role::Serveur);
        assert!(can_access_route(Some(&serveur), "/tables").allowed);
        assert!(can_access_route(Some(&serveur), "/tables/12").allowed);
        assert!(!can_access_route(Some(&serveur), "/tables/plan").allowed);
        assert!(!can_access_route(Some(&serveur), "/caisse").allowed);
        assert!(!can_access_route(Some(&serveur), "/stock").allowed);
        assert!(can_access_route(Some(&serveur), "/produits/42").allowed);
        assert!(!can_access_route(Some(&serveur), "/produits/nouveau").allowed);

        let caissier = user(Role::Caissier);
        assert!(can_access_route(Some(&caissier), "/caisse").allowed);
        assert!(can_access_route(Some(&caissier), "/stock").allowed);
        assert!(!can_access_route(Some(&caissier), "/stock/inventaire").allowed);
    }

    #[test]
    fn test_manager_routes() {
        let manager = user(Role::Manager);
        assert!(can_access_route(Some(&manager), "/utilisateurs").allowed);
        assert!(can_access_route(Some(&manager), "/parametres").allowed);
        assert!(can_access_route(Some(&manager), "/stock/inventaire").allowed);
    }

    #[test]
    fn test_accessible_routes_for_serveur() {
        let routes = accessible_routes(&user(Role::Serveur));
        assert_eq!(
            routes,
            vec![
                "/dashboard",
                "/profil",
                "/produits",
                "/categories",
                "/ventes",
                "/tables",
                "/clients"
            ]
        );
    }
}
