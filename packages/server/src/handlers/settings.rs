use std::collections::BTreeMap;

use axum::{Json, extract::State};
use sea_orm::*;
use serde_json::Value;
use tracing::instrument;

use crate::entity::setting;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::settings::{SettingsMap, validate_settings};
use crate::models::shared::SuccessResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    operation_id = "getSettings",
    summary = "Get store settings",
    description = "Returns every stored setting as a key→value object.",
    responses(
        (status = 200, description = "Settings map", body = BTreeMap<String, String>),
    ),
)]
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsMap>, AppError> {
    let rows = setting::Entity::find().all(&state.db).await?;

    Ok(Json(rows.into_iter().map(|s| (s.key, s.value)).collect()))
}

#[utoipa::path(
    post,
    path = "/settings",
    tag = "Settings",
    operation_id = "updateSettings",
    summary = "Upsert store settings",
    description = "Inserts or overwrites every key in the body in a single transaction. Values may be strings, numbers or booleans; any other value rejects the whole request before anything is written.",
    request_body = BTreeMap<String, String>,
    responses(
        (status = 200, description = "Settings saved", body = SuccessResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id, keys = payload.len()))]
pub async fn update_settings(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BTreeMap<String, Value>>,
) -> Result<Json<SuccessResponse>, AppError> {
    let pairs = validate_settings(payload)?;

    let txn = state.db.begin().await?;
    for (key, value) in &pairs {
        setting::upsert(&txn, key, value).await?;
    }
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}
