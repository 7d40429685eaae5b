//! Authentication Handlers
//!
//! Password and PIN login. Both wait a fixed delay before answering and
//! use one error for unknown user and wrong secret.

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, PinLoginRequest, UserInfo};

use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::db::repository::employee::{self, EmployeeCredentials};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

enum Secret<'a> {
    Password(&'a str),
    Pin(&'a str),
}

impl Secret<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Secret::Password(_) => "password",
            Secret::Pin(_) => "pin",
        }
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_payload(&req)?;
    authenticate(&state, &req.username, Secret::Password(&req.password)).await
}

/// POST /api/auth/pin
pub async fn pin_login(
    State(state): State<ServerState>,
    Json(req): Json<PinLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_payload(&req)?;
    authenticate(&state, &req.username, Secret::Pin(&req.pin)).await
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(user.to_user_info())
}

async fn authenticate(
    state: &ServerState,
    username: &str,
    secret: Secret<'_>,
) -> AppResult<Json<LoginResponse>> {
    let found = employee::find_credentials(state.pool(), username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(state.config.auth_fixed_delay_ms)).await;

    let Some(EmployeeCredentials {
        employee,
        password_hash,
        pin_hash,
    }) = found
    else {
        security_log!("WARN", "login_failed", username = username, reason = "unknown_user");
        return Err(AppError::invalid_credentials());
    };

    let valid = match (&secret, pin_hash.as_deref()) {
        (Secret::Password(password), _) => verify_password(password, &password_hash)?,
        (Secret::Pin(pin), Some(hash)) => verify_password(pin, hash)?,
        (Secret::Pin(_), None) => false,
    };
    if !valid {
        security_log!(
            "WARN",
            "login_failed",
            username = username,
            method = secret.kind(),
            reason = "invalid_secret"
        );
        return Err(AppError::invalid_credentials());
    }

    if !employee.is_active {
        security_log!("WARN", "login_disabled", username = username);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let matrix = state
        .permissions
        .get_or_load(state.pool(), employee.establishment_id)
        .await?;

    let user = CurrentUser {
        id: employee.id,
        username: employee.username,
        display_name: employee.display_name,
        role: employee.role,
        establishment_id: employee.establishment_id,
        permissions: matrix.permissions_for(employee.role).iter().copied().collect(),
        allowed_routes: employee.allowed_routes,
    };

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        method = secret.kind(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user.to_user_info(),
    }))
}
