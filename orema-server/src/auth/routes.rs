//! UI route configuration
//!
//! Static rules for the web client's pages. A path without a rule of its
//! own inherits the rule of its nearest configured parent
//! (`/produits/123` → `/produits`).

use shared::models::{Permission, Role};

use Permission::*;

/// Access rule of one UI route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub path: &'static str,
    /// Any authenticated user may open it
    pub public_for_authenticated: bool,
    pub allowed_roles: Option<&'static [Role]>,
    pub min_role: Option<Role>,
    /// Every permission is required (AND)
    pub required_all_permissions: Option<&'static [Permission]>,
    /// One permission is enough (OR)
    pub required_permissions: Option<&'static [Permission]>,
}

impl RouteRule {
    const fn public(path: &'static str) -> Self {
        Self {
            path,
            public_for_authenticated: true,
            allowed_roles: None,
            min_role: None,
            required_all_permissions: None,
            required_permissions: None,
        }
    }

    const fn any_of(path: &'static str, permissions: &'static [Permission]) -> Self {
        Self {
            path,
            public_for_authenticated: false,
            allowed_roles: None,
            min_role: None,
            required_all_permissions: None,
            required_permissions: Some(permissions),
        }
    }

    const fn all_of(path: &'static str, permissions: &'static [Permission]) -> Self {
        Self {
            path,
            public_for_authenticated: false,
            allowed_roles: None,
            min_role: None,
            required_all_permissions: Some(permissions),
            required_permissions: None,
        }
    }

    const fn roles(path: &'static str, roles: &'static [Role]) -> Self {
        Self {
            path,
            public_for_authenticated: false,
            allowed_roles: Some(roles),
            min_role: None,
            required_all_permissions: None,
            required_permissions: None,
        }
    }

    const fn with_min_role(mut self, role: Role) -> Self {
        self.min_role = Some(role);
        self
    }
}

const ADMIN_ROLES: &[Role] = &[Role::SuperAdmin, Role::Admin];

pub static ROUTES: &[RouteRule] = &[
    RouteRule::public("/dashboard"),
    RouteRule::public("/profil"),
    RouteRule::any_of("/produits", &[ProduitVoir]),
    RouteRule::all_of("/produits/nouveau", &[ProduitVoir, ProduitCreer]),
    RouteRule::any_of("/categories", &[CategorieVoir]),
    RouteRule::any_of("/ventes", &[VenteVoir]),
    RouteRule::all_of("/caisse", &[VenteCreer, PaiementEncaisser]),
    RouteRule::any_of("/tables", &[TableVoir]),
    RouteRule::all_of("/tables/plan", &[TableVoir, TableModifier]),
    RouteRule::any_of("/sessions", &[SessionVoir]),
    RouteRule::any_of("/clients", &[ClientVoir]),
    RouteRule::any_of("/stock", &[StockVoir]),
    RouteRule::all_of("/stock/inventaire", &[StockVoir, StockInventaire]),
    RouteRule::any_of("/rapports", &[RapportVoir]).with_min_role(Role::Manager),
    RouteRule::all_of("/utilisateurs", &[UtilisateurVoir]).with_min_role(Role::Manager),
    RouteRule::roles("/permissions", ADMIN_ROLES),
    RouteRule::any_of("/parametres", &[ParametresVoir]).with_min_role(Role::Manager),
    RouteRule::roles("/etablissement", ADMIN_ROLES),
];

fn find_exact(path: &str) -> Option<&'static RouteRule> {
    ROUTES.iter().find(|rule| rule.path == path)
}

/// Rule for `path`: exact match, else the nearest parent on `/` boundaries
pub fn find_route_config(path: &str) -> Option<&'static RouteRule> {
    let mut current = path;
    loop {
        if let Some(rule) = find_exact(current) {
            return Some(rule);
        }
        match current.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => current = parent,
            _ => return None,
        }
    }
}

/// Whitelist entry matches `path` itself or anything below it
pub fn route_matches_prefix(path: &str, entry: &str) -> bool {
    path == entry
        || path
            .strip_prefix(entry)
            .is_some_and(|rest| rest.starts_with('/'))
}
