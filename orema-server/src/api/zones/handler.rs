//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, Zone, ZoneCreate, ZoneUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{dining_table, zone};
use crate::tables;
use crate::utils::{AppResult, validate_payload};

/// GET /api/zones - 获取所有区域
pub async fn list(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Vec<Zone>>> {
    let zones = zone::find_all(state.pool(), user.establishment_id).await?;
    Ok(Json(zones))
}

/// GET /api/zones/:id - 获取单个区域
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Zone>> {
    let zone = tables::get_zone(state.pool(), user.establishment_id, id).await?;
    Ok(Json(zone))
}

/// POST /api/zones - 创建区域
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ZoneCreate>,
) -> AppResult<Json<Zone>> {
    validate_payload(&payload)?;
    let zone = tables::create_zone(state.pool(), user.establishment_id, payload).await?;
    tracing::info!(zone_id = zone.id, name = %zone.name, operator = user.id, "Zone created");
    Ok(Json(zone))
}

/// PUT /api/zones/:id - 更新区域
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ZoneUpdate>,
) -> AppResult<Json<Zone>> {
    validate_payload(&payload)?;
    let zone = tables::update_zone(state.pool(), user.establishment_id, id, payload).await?;
    Ok(Json(zone))
}

/// DELETE /api/zones/:id - 删除区域 (仍有启用桌台时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tables::delete_zone(state.pool(), user.establishment_id, id).await?;
    tracing::info!(zone_id = id, operator = user.id, "Zone deleted");
    Ok(Json(true))
}

/// GET /api/zones/:id/tables - 获取区域内的所有桌台
pub async fn list_tables(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(zone_id): Path<i64>,
) -> AppResult<Json<Vec<DiningTable>>> {
    tables::get_zone(state.pool(), user.establishment_id, zone_id).await?;
    let tables = dining_table::find_all(state.pool(), user.establishment_id, Some(zone_id)).await?;
    Ok(Json(tables))
}
