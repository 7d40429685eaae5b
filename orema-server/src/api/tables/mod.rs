//! Dining Table API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/tables | GET | table:voir |
//! | /api/tables | POST | table:creer |
//! | /api/tables/{id} | GET | table:voir |
//! | /api/tables/{id} | PUT | table:modifier |
//! | /api/tables/{id} | DELETE | table:supprimer |
//! | /api/tables/{id}/status | PUT | vente:modifier |
//! | /api/tables/{id}/bill | POST | vente:modifier |
//! | /api/tables/{id}/order | GET | vente:voir |
//! | /api/tables/transfer | POST | table:transferer |
//! | /api/tables/merge | POST | table:transferer |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::models::Permission;

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission(Permission::TableVoir)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission(Permission::TableCreer)));

    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission(Permission::TableModifier)));

    let delete_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_permission(Permission::TableSupprimer)));

    // 服务员日常操作: 清台、请求结账
    let service_routes = Router::new()
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/bill", post(handler::request_bill))
        .layer(middleware::from_fn(require_permission(Permission::VenteModifier)));

    let order_routes = Router::new()
        .route("/{id}/order", get(handler::current_order))
        .layer(middleware::from_fn(require_permission(Permission::VenteVoir)));

    let transfer_routes = Router::new()
        .route("/transfer", post(handler::transfer))
        .route("/merge", post(handler::merge))
        .layer(middleware::from_fn(require_permission(Permission::TableTransferer)));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
        .merge(service_routes)
        .merge(order_routes)
        .merge(transfer_routes)
}
