//! Employee API Handlers
//!
//! An actor manages only employees of strictly lower rank and assigns
//! only strictly lower roles; SUPER_ADMIN may do both for any role.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, Role};
use shared::util::normalize_route;

use crate::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::auth::permissions::can_manage_user;
use crate::core::ServerState;
use crate::db::repository::employee::{self, EmployeeChanges, NewEmployee};
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        .with_detail("employee_id", id)
}

fn map_write_error(err: RepoError, id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::EmployeeUsernameExists).with_detail("field", "username")
        }
        RepoError::NotFound(_) => match id {
            Some(id) => not_found(id),
            None => AppError::new(ErrorCode::EmployeeNotFound),
        },
        other => other.into(),
    }
}

fn ensure_can_manage(actor: &CurrentUser, target: Role) -> AppResult<()> {
    if actor.role == Role::SuperAdmin || can_manage_user(actor.role, target) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "manage_user_denied",
        user_id = actor.id,
        actor_role = actor.role.as_str(),
        target_role = target.as_str()
    );
    Err(AppError::with_message(
        ErrorCode::CannotManageUser,
        format!("{} cannot manage {}", actor.role, target),
    )
    .with_detail("role", target.as_str()))
}

fn normalize_routes(routes: Option<Vec<String>>) -> Option<Vec<String>> {
    routes.map(|list| list.iter().map(|r| normalize_route(r)).collect())
}

/// GET /api/employees
pub async fn list(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Vec<Employee>>> {
    let employees = employee::find_all(state.pool(), user.establishment_id).await?;
    Ok(Json(employees))
}

/// GET /api/employees/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let found = employee::find_by_id(state.pool(), user.establishment_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/employees
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    validate_payload(&payload)?;
    ensure_can_manage(&user, payload.role)?;

    let password_hash = hash_password(&payload.password)?;
    let pin_hash = payload.pin.as_deref().map(hash_password).transpose()?;

    let created = employee::create(
        state.pool(),
        user.establishment_id,
        NewEmployee {
            username: payload.username.trim().to_string(),
            display_name: payload.display_name,
            password_hash,
            pin_hash,
            role: payload.role,
            allowed_routes: normalize_routes(payload.allowed_routes),
        },
    )
    .await
    .map_err(|e| map_write_error(e, None))?;

    tracing::info!(
        employee_id = created.id,
        username = %created.username,
        role = %created.role,
        operator = user.id,
        "Employee created"
    );
    Ok(Json(created))
}

/// PUT /api/employees/:id
///
/// Employees may change their own name, password and PIN but not their
/// role, whitelist or active flag.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    validate_payload(&payload)?;

    let target = employee::find_by_id(state.pool(), user.establishment_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if target.id == user.id {
        if payload.role.is_some() || payload.allowed_routes.is_some() || payload.is_active.is_some() {
            return Err(AppError::new(ErrorCode::EmployeeCannotModifySelf));
        }
    } else {
        ensure_can_manage(&user, target.role)?;
        if let Some(role) = payload.role {
            ensure_can_manage(&user, role)?;
        }
    }

    let changes = EmployeeChanges {
        display_name: payload.display_name,
        password_hash: payload.password.as_deref().map(hash_password).transpose()?,
        pin_hash: payload.pin.as_deref().map(hash_password).transpose()?,
        role: payload.role,
        allowed_routes: payload.allowed_routes.map(normalize_routes),
        is_active: payload.is_active,
    };

    let updated = employee::update(state.pool(), user.establishment_id, id, changes)
        .await
        .map_err(|e| map_write_error(e, Some(id)))?;
    tracing::info!(employee_id = id, operator = user.id, "Employee updated");
    Ok(Json(updated))
}

/// DELETE /api/employees/:id - 停用账号
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let target = employee::find_by_id(state.pool(), user.establishment_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if target.id == user.id {
        return Err(AppError::new(ErrorCode::EmployeeCannotModifySelf));
    }
    ensure_can_manage(&user, target.role)?;

    let changes = EmployeeChanges {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = employee::update(state.pool(), user.establishment_id, id, changes)
        .await
        .map_err(|e| map_write_error(e, Some(id)))?;
    tracing::info!(employee_id = id, operator = user.id, "Employee deactivated");
    Ok(Json(updated))
}
