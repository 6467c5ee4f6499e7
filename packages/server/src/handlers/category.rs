use axum::{
    Json,
    extract::State,
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, product};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::category::{CategoryRequest, CategoryResponse, validate_category};
use crate::models::shared::{IdResponse, SuccessResponse};
use crate::state::AppState;

fn map_unique_violation(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Category name already exists".into())
        }
        _ => AppError::from(e),
    }
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories",
    description = "Returns every category ordered by name.",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = IdResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR, CONFLICT)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id, name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<IdResponse>, AppError> {
    let name = validate_category(&payload)?;

    let model = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(map_unique_violation)?;

    Ok(Json(IdResponse { id: model.id }))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Rename a category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = SuccessResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR, CONFLICT)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id, name = %payload.name))]
pub async fn update_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let name = validate_category(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_category(&txn, id).await?;
    let mut active: category::ActiveModel = existing.into();
    active.name = Set(name);
    active.update(&txn).await.map_err(map_unique_violation)?;

    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Refused with CATEGORY_IN_USE while any product references the category. The reference count and the delete run in one transaction.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = SuccessResponse),
        (status = 400, description = "Category still referenced (CATEGORY_IN_USE)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SuccessResponse>, AppError> {
    let txn = state.db.begin().await?;

    find_category(&txn, id).await?;

    let references = product::Entity::find()
        .filter(product::Column::CategoryId.eq(id))
        .count(&txn)
        .await?;
    if references > 0 {
        return Err(AppError::InUse(format!(
            "Cannot delete category: {references} product(s) still use it"
        )));
    }

    category::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}
