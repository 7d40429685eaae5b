//! Role permission API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/roles | GET | 各角色当前有效权限 |
//! | /api/roles/{role}/permissions | PUT | 覆盖角色权限 |
//! | /api/roles/{role}/permissions | DELETE | 恢复默认权限 |
//!
//! 全部需要 `role:gerer`；修改还要求级别严格高于目标角色。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};
use shared::models::Permission;

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/roles", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route(
            "/{role}/permissions",
            put(handler::set_permissions).delete(handler::reset_permissions),
        )
        .layer(middleware::from_fn(require_permission(Permission::RoleGerer)))
}
