//! Route access API
//!
//! The web client asks before rendering a page.

use axum::{
    Json, Router,
    extract::Query,
    routing::get,
};
use shared::client::{AccessCheckQuery, RouteAccess};

use crate::auth::{CurrentUser, accessible_routes, can_access_route};
use crate::core::ServerState;
use crate::security_log;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/access/check", get(check))
        .route("/api/access/routes", get(routes))
}

/// GET /api/access/check?path=/produits/12
async fn check(user: CurrentUser, Query(query): Query<AccessCheckQuery>) -> Json<RouteAccess> {
    let decision = can_access_route(Some(&user), &query.path);
    if !decision.allowed {
        security_log!(
            "INFO",
            "route_denied",
            user_id = user.id,
            path = query.path.as_str(),
            reason = decision.reason.as_deref().unwrap_or_default()
        );
    }
    Json(decision)
}

/// GET /api/access/routes
async fn routes(user: CurrentUser) -> Json<Vec<&'static str>> {
    Json(accessible_routes(&user))
}
