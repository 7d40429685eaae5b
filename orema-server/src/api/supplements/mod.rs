//! Supplement API 模块
//!
//! Catalog supplements share the product permissions.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Permission;

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/supplements", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_permission(Permission::ProduitVoir)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission(Permission::ProduitCreer)));

    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission(Permission::ProduitModifier)));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::deactivate))
        .layer(middleware::from_fn(require_permission(Permission::ProduitSupprimer)));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
