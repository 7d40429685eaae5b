//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, MergeOutcome, OrderDetail, OrderMerge,
    TableQuery, TableStatusUpdate, TableTransfer, TransferOutcome,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::tables;
use crate::utils::{AppResult, validate_payload};

/// GET /api/tables?zone_id= - 获取桌台列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(state.pool(), user.establishment_id, query.zone_id).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = tables::get_table(state.pool(), user.establishment_id, id).await?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_payload(&payload)?;
    let table = tables::create_table(state.pool(), user.establishment_id, payload).await?;
    tracing::info!(table_id = table.id, number = %table.number, operator = user.id, "Table created");
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台 (含平面图位置)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    validate_payload(&payload)?;
    let table = tables::update_table(state.pool(), user.establishment_id, id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tables::delete_table(state.pool(), user.establishment_id, id).await?;
    tracing::info!(table_id = id, operator = user.id, "Table deleted");
    Ok(Json(true))
}

/// PUT /api/tables/:id/status
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = tables::set_table_status(state.pool(), user.establishment_id, id, payload.status).await?;
    Ok(Json(table))
}

/// POST /api/tables/:id/bill - 请求结账
pub async fn request_bill(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = tables::request_bill(state.pool(), user.establishment_id, id).await?;
    Ok(Json(table))
}

/// GET /api/tables/:id/order - 当前进行中的订单 (无则 null)
pub async fn current_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Option<OrderDetail>>> {
    let order = tables::current_order(state.pool(), user.establishment_id, id).await?;
    Ok(Json(order))
}

/// POST /api/tables/transfer - 转台
///
/// `{"status":"MERGE_REQUIRED"}` is a 200 answer: nothing changed and the
/// client may call `/api/tables/merge`.
pub async fn transfer(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TableTransfer>,
) -> AppResult<Json<TransferOutcome>> {
    let outcome = tables::transfer_table(state.pool(), user.establishment_id, payload).await?;
    Ok(Json(outcome))
}

/// POST /api/tables/merge - 并单
pub async fn merge(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderMerge>,
) -> AppResult<Json<MergeOutcome>> {
    let outcome = tables::merge_table_orders(state.pool(), user.establishment_id, payload).await?;
    Ok(Json(outcome))
}
