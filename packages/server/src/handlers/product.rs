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
use crate::models::product::{ProductListItem, ProductRequest, validate_product};
use crate::models::shared::{IdResponse, SuccessResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List all products",
    description = "Returns every product ordered by ID, with the name of its category in `category` (`null` when unset or when the category no longer exists).",
    responses(
        (status = 200, description = "All products", body = Vec<ProductListItem>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListItem>>, AppError> {
    let items = product::Entity::find()
        .select_only()
        .columns([
            product::Column::Id,
            product::Column::Name,
            product::Column::Price,
            product::Column::Stock,
            product::Column::Description,
            product::Column::CategoryId,
            product::Column::Image,
        ])
        .column_as(category::Column::Name, "category")
        .join(JoinType::LeftJoin, product::Relation::Category.def())
        .order_by_asc(product::Column::Id)
        .into_model::<ProductListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product",
    description = "Numeric fields accept numbers or numeric strings. `category_id` is not checked against existing categories.",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product created", body = IdResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id, name = %payload.name))]
pub async fn create_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<Json<IdResponse>, AppError> {
    let fields = validate_product(payload)?;

    let model = product::ActiveModel {
        name: Set(fields.name),
        price: Set(fields.price),
        stock: Set(fields.stock),
        description: Set(fields.description),
        category_id: Set(fields.category_id),
        image: Set(fields.image),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(IdResponse { id: model.id }))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    operation_id = "updateProduct",
    summary = "Replace a product",
    description = "Overwrites every mutable field. Fields left out of the body are reset (`stock` to 0, the rest to `null`).",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = SuccessResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.user_id))]
pub async fn update_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let fields = validate_product(payload)?;

    let txn = state.db.begin().await?;

    let existing = find_product(&txn, id).await?;
    let mut active: product::ActiveModel = existing.into();
    active.name = Set(fields.name);
    active.price = Set(fields.price);
    active.stock = Set(fields.stock);
    active.description = Set(fields.description);
    active.category_id = Set(fields.category_id);
    active.image = Set(fields.image);
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = SuccessResponse),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn delete_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SuccessResponse>, AppError> {
    let result = product::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product not found".into()));
    }

    Ok(Json(SuccessResponse::ok()))
}

async fn find_product<C: ConnectionTrait>(db: &C, id: i32) -> Result<product::Model, AppError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}
