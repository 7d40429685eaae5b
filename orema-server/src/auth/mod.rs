//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] / [`require_permission`] - 中间件
//! - [`permissions`] - 角色权限矩阵与门店覆盖
//! - [`access`] - 前端路由访问判定

pub mod access;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod routes;

pub use access::{accessible_routes, can_access_route};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_permission};
pub use permissions::{PermissionCache, PermissionMatrix};
