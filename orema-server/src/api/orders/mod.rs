//! Order API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Permission;

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission(Permission::VenteVoir)));

    let create_routes = Router::new()
        .route("/", post(handler::open))
        .layer(middleware::from_fn(require_permission(Permission::VenteCreer)));

    let line_routes = Router::new()
        .route("/{id}/lines", post(handler::add_line))
        .route("/{id}/lines/{line_id}", delete(handler::remove_line))
        .route("/{id}/lines/{line_id}/status", put(handler::set_line_status))
        .layer(middleware::from_fn(require_permission(Permission::VenteModifier)));

    let discount_routes = Router::new()
        .route("/{id}/discount", put(handler::apply_discount))
        .layer(middleware::from_fn(require_permission(Permission::VenteRemise)));

    let pay_routes = Router::new()
        .route("/{id}/pay", post(handler::pay))
        .layer(middleware::from_fn(require_permission(Permission::PaiementEncaisser)));

    let cancel_routes = Router::new()
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_permission(Permission::VenteAnnuler)));

    read_routes
        .merge(create_routes)
        .merge(line_routes)
        .merge(discount_routes)
        .merge(pay_routes)
        .merge(cancel_routes)
}
