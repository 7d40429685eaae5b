//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    LineStatusUpdate, Order, OrderDetail, OrderDiscount, OrderLineCreate, OrderOpen, OrderPay,
    OrderQuery,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders;
use crate::utils::{AppResult, validate_payload};

/// GET /api/orders?status=&table_id=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(state.pool(), user.establishment_id, &query).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (含明细与加料)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::get_detail(state.pool(), user.establishment_id, id).await?;
    Ok(Json(detail))
}

/// POST /api/orders - 开单
pub async fn open(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderOpen>,
) -> AppResult<Json<Order>> {
    let order = orders::open_order(state.pool(), user.establishment_id, Some(user.id), payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/lines - 加菜
pub async fn add_line(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderLineCreate>,
) -> AppResult<Json<OrderDetail>> {
    validate_payload(&payload)?;
    let detail = orders::add_line(state.pool(), user.establishment_id, id, payload).await?;
    Ok(Json(detail))
}

/// DELETE /api/orders/:id/lines/:line_id
pub async fn remove_line(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, line_id)): Path<(i64, i64)>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::remove_line(state.pool(), user.establishment_id, id, line_id).await?;
    Ok(Json(detail))
}

/// PUT /api/orders/:id/lines/:line_id/status - 出餐状态
pub async fn set_line_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, line_id)): Path<(i64, i64)>,
    Json(payload): Json<LineStatusUpdate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::set_line_status(
        state.pool(),
        user.establishment_id,
        id,
        line_id,
        payload.preparation_status,
    )
    .await?;
    Ok(Json(detail))
}

/// PUT /api/orders/:id/discount
pub async fn apply_discount(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderDiscount>,
) -> AppResult<Json<Order>> {
    validate_payload(&payload)?;
    let order = orders::apply_discount(state.pool(), user.establishment_id, id, payload.amount).await?;
    tracing::info!(order_id = id, amount = payload.amount, operator = user.id, "Discount applied");
    Ok(Json(order))
}

/// POST /api/orders/:id/pay - 结账
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPay>,
) -> AppResult<Json<Order>> {
    let order = orders::pay_order(state.pool(), user.establishment_id, id, payload.payment_method).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = orders::cancel_order(state.pool(), user.establishment_id, id).await?;
    tracing::info!(order_id = id, operator = user.id, "Order cancelled");
    Ok(Json(order))
}
