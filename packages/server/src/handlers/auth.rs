use axum::{Json, extract::State};
use sea_orm::*;
use tracing::{instrument, warn};

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, MeResponse, validate_login_request};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in as the store administrator",
    description = "Verifies the username and password and returns a bearer token. Unknown users and wrong passwords produce the same response.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.as_str()))
        .one(&state.db)
        .await?;

    let Some(user) = user else {
        hash::verify_dummy(&payload.password);
        return Err(AppError::InvalidCredentials);
    };

    // Accounts carried over from older stores may hold non-Argon2 hashes.
    let is_valid = match hash::verify_password(&payload.password, &user.password) {
        Ok(valid) => valid,
        Err(e) => {
            warn!(user_id = user.id, "Stored password hash is unreadable: {}", e);
            false
        }
    };

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(
        user.id,
        &user.username,
        &state.config.auth.jwt_secret,
        chrono::Duration::hours(state.config.auth.token_ttl_hours),
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getCurrentUser",
    summary = "Get the authenticated identity",
    description = "Returns the identity carried by the bearer token. Used by the dashboard to check a stored token.",
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        username: auth_user.username,
    })
}
