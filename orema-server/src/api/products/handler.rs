//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}

fn check_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "price"));
    }
    Ok(())
}

/// GET /api/products
pub async fn list(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(state.pool(), user.establishment_id).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(state.pool(), user.establishment_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    check_price(payload.price)?;
    validate_payload(&payload)?;
    let product = product::create(state.pool(), user.establishment_id, payload).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(price) = payload.price {
        check_price(price)?;
    }
    validate_payload(&payload)?;
    let product = product::update(state.pool(), user.establishment_id, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 停用 (历史订单保留商品快照)
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let changes = ProductUpdate {
        is_active: Some(false),
        ..Default::default()
    };
    let product = product::update(state.pool(), user.establishment_id, id, changes)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    tracing::info!(product_id = id, operator = user.id, "Product deactivated");
    Ok(Json(product))
}
