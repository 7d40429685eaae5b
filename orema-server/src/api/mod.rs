//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录 (密码 / PIN)、当前用户
//! - [`access`] - 前端路由访问判定
//! - [`establishment`] - 当前门店
//! - [`zones`] - 区域管理接口
//! - [`tables`] - 桌台管理、转台、并单
//! - [`orders`] - 订单生命周期
//! - [`products`] - 商品管理接口
//! - [`supplements`] - 加料管理接口
//! - [`employees`] - 员工管理接口
//! - [`roles`] - 角色权限覆盖

pub mod access;
pub mod auth;
pub mod employees;
pub mod establishment;
pub mod health;
pub mod orders;
pub mod products;
pub mod roles;
pub mod supplements;
pub mod tables;
pub mod zones;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login is public, the rest needs a token
        .merge(auth::router())
        .merge(access::router())
        .merge(establishment::router())
        .merge(zones::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(supplements::router())
        .merge(employees::router())
        .merge(roles::router())
}
