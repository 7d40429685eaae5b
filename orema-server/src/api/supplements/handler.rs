//! Supplement API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Supplement, SupplementCreate, SupplementUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, supplement};
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

fn map_write_error(err: RepoError, id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => {
            AppError::with_message(ErrorCode::SupplementNotFound, format!("Supplement {id} not found"))
                .with_detail("supplement_id", id)
        }
        other => other.into(),
    }
}

/// GET /api/supplements
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Supplement>>> {
    let supplements = supplement::find_all(state.pool(), user.establishment_id).await?;
    Ok(Json(supplements))
}

/// POST /api/supplements
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SupplementCreate>,
) -> AppResult<Json<Supplement>> {
    validate_payload(&payload)?;
    let supplement = supplement::create(state.pool(), user.establishment_id, payload).await?;
    Ok(Json(supplement))
}

/// PUT /api/supplements/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<SupplementUpdate>,
) -> AppResult<Json<Supplement>> {
    validate_payload(&payload)?;
    let supplement = supplement::update(state.pool(), user.establishment_id, id, payload)
        .await
        .map_err(|e| map_write_error(e, id))?;
    Ok(Json(supplement))
}

/// DELETE /api/supplements/:id - 停用
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Supplement>> {
    let changes = SupplementUpdate {
        is_active: Some(false),
        ..Default::default()
    };
    let supplement = supplement::update(state.pool(), user.establishment_id, id, changes)
        .await
        .map_err(|e| map_write_error(e, id))?;
    Ok(Json(supplement))
}
