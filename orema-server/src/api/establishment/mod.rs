//! 门店信息路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/establishment | GET | 当前用户所属门店 | 登录即可 |

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Establishment;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::establishment;
use crate::utils::{AppError, AppResult, ErrorCode};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/establishment", get(current))
}

/// GET /api/establishment
async fn current(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Establishment>> {
    establishment::find_by_id(state.pool(), user.establishment_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::new(ErrorCode::EstablishmentNotFound).with_detail("establishment_id", user.establishment_id)
        })
}
