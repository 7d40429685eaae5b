//! Role permission Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Role, RolePermissions, RolePermissionsUpdate};

use crate::auth::CurrentUser;
use crate::auth::permissions::{is_role_above, parse_permissions};
use crate::core::ServerState;
use crate::db::repository::role_permission;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Resolve the path role and check the actor may edit it
fn editable_role(user: &CurrentUser, raw: &str) -> AppResult<Role> {
    let role = raw.parse::<Role>().map_err(|e| {
        AppError::with_message(ErrorCode::RoleNotFound, e.to_string()).with_detail("role", raw)
    })?;

    if role == Role::SuperAdmin {
        return Err(AppError::new(ErrorCode::RoleImmutable).with_detail("role", role.as_str()));
    }

    if !is_role_above(user.role, role) {
        security_log!(
            "WARN",
            "role_edit_denied",
            user_id = user.id,
            actor_role = user.role.as_str(),
            target_role = role.as_str()
        );
        return Err(AppError::with_message(
            ErrorCode::CannotManageUser,
            format!("{} cannot edit {}", user.role, role),
        )
        .with_detail("role", role.as_str()));
    }
    Ok(role)
}

/// GET /api/roles
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<RolePermissions>>> {
    let matrix = state
        .permissions
        .get_or_load(state.pool(), user.establishment_id)
        .await?;
    Ok(Json(matrix.describe()))
}

/// PUT /api/roles/:role/permissions
///
/// Takes effect for a user at their next login.
pub async fn set_permissions(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(raw_role): Path<String>,
    Json(payload): Json<RolePermissionsUpdate>,
) -> AppResult<Json<RolePermissions>> {
    let role = editable_role(&user, &raw_role)?;
    let permissions = parse_permissions(&payload.permissions)?;

    let current = state
        .permissions
        .get_or_load(state.pool(), user.establishment_id)
        .await?;
    let mut matrix = (*current).clone();
    matrix.set_override(role, permissions)?;

    role_permission::upsert(
        state.pool(),
        user.establishment_id,
        role,
        matrix.permissions_for(role),
    )
    .await?;
    state.permissions.invalidate(user.establishment_id);

    tracing::info!(
        role = %role,
        count = matrix.permissions_for(role).len(),
        operator = user.id,
        "Role permissions overridden"
    );
    Ok(Json(matrix.describe_role(role)))
}

/// DELETE /api/roles/:role/permissions - 恢复默认
pub async fn reset_permissions(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(raw_role): Path<String>,
) -> AppResult<Json<RolePermissions>> {
    let role = editable_role(&user, &raw_role)?;

    let removed = role_permission::delete(state.pool(), user.establishment_id, role).await?;
    state.permissions.invalidate(user.establishment_id);
    if removed {
        tracing::info!(role = %role, operator = user.id, "Role permissions reset to default");
    }

    let matrix = state
        .permissions
        .get_or_load(state.pool(), user.establishment_id)
        .await?;
    Ok(Json(matrix.describe_role(role)))
}
