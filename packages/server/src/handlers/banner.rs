use axum::{
    Json,
    extract::State,
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::banner;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::banner::{BannerRequest, BannerResponse, validate_banner};
use crate::models::shared::{IdResponse, SuccessResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/banners",
    tag = "Banners",
    operation_id = "listActiveBanners",
    summary = "List active banners",
    description = "Storefront view: only banners with `active = true`.",
    responses(
        (status = 200, description = "Active banners", body = Vec<BannerResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_active_banners(
    State(state): State<AppState>,
) -> Result<Json<Vec<BannerResponse>>, AppError> {
    let banners = banner::Entity::find()
        .filter(banner::Column::Active.eq(true))
        .order_by_asc(banner::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(banners.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/banners",
    tag = "Banners",
    operation_id = "listAllBanners",
    summary = "List all banners",
    description = "Dashboard view: active and inactive banners.",
    responses(
        (status = 200, description = "All banners", body = Vec<BannerResponse>),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn list_all_banners(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<BannerResponse>>, AppError> {
    let banners = banner::Entity::find()
        .order_by_asc(banner::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(banners.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/banners",
    tag = "Banners",
    operation_id = "createBanner",
    summary = "Create a banner",
    description = "`active` defaults to true when omitted.",
    request_body = BannerRequest,
    responses(
        (status = 200, description = "Banner created", body = IdResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id, title = %payload.title))]
pub async fn create_banner(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BannerRequest>,
) -> Result<Json<IdResponse>, AppError> {
    let fields = validate_banner(payload, true)?;

    let model = banner::ActiveModel {
        title: Set(fields.title),
        subtitle: Set(fields.subtitle),
        image: Set(fields.image),
        active: Set(fields.active),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(IdResponse { id: model.id }))
}

#[utoipa::path(
    put,
    path = "/banners/{id}",
    tag = "Banners",
    operation_id = "updateBanner",
    summary = "Replace a banner",
    description = "Overwrites every field including `active`; an omitted `active` deactivates the banner.",
    params(("id" = i32, Path, description = "Banner ID")),
    request_body = BannerRequest,
    responses(
        (status = 200, description = "Banner updated", body = SuccessResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Banner not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id))]
pub async fn update_banner(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<BannerRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let fields = validate_banner(payload, false)?;

    let txn = state.db.begin().await?;

    let existing = banner::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Banner not found".into()))?;
    let mut active: banner::ActiveModel = existing.into();
    active.title = Set(fields.title);
    active.subtitle = Set(fields.subtitle);
    active.image = Set(fields.image);
    active.active = Set(fields.active);
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/banners/{id}",
    tag = "Banners",
    operation_id = "deleteBanner",
    summary = "Delete a banner",
    params(("id" = i32, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Banner deleted", body = SuccessResponse),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Banner not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn delete_banner(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SuccessResponse>, AppError> {
    let result = banner::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Banner not found".into()));
    }

    Ok(Json(SuccessResponse::ok()))
}
