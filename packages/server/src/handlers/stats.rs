use axum::{Json, extract::State};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, product};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::stats::{CategoryStat, StatsResponse};
use crate::state::AppState;

#[derive(FromQueryResult)]
struct PriceTotals {
    avg_price: Option<f64>,
    stock_value: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Stats",
    operation_id = "getStats",
    summary = "Dashboard statistics",
    description = "Product and category counts, mean price, total stock value, and the number of products in every category (categories without products report 0).",
    responses(
        (status = 200, description = "Aggregates", body = StatsResponse),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn get_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let total_products = product::Entity::find().count(&state.db).await?;
    let total_categories = category::Entity::find().count(&state.db).await?;

    let totals = product::Entity::find()
        .select_only()
        .column_as(Expr::cust("AVG(\"price\")"), "avg_price")
        .column_as(Expr::cust("SUM(\"price\" * \"stock\")"), "stock_value")
        .into_model::<PriceTotals>()
        .one(&state.db)
        .await?;
    let (avg_price, stock_value) = totals
        .map(|t| (t.avg_price.unwrap_or(0.0), t.stock_value.unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0));

    let category_stats = category::Entity::find()
        .select_only()
        .column(category::Column::Name)
        .column_as(Expr::cust("COUNT(\"products\".\"id\")"), "count")
        .join(JoinType::LeftJoin, category::Relation::Product.def())
        .group_by(category::Column::Id)
        .group_by(category::Column::Name)
        .order_by_asc(category::Column::Name)
        .into_model::<CategoryStat>()
        .all(&state.db)
        .await?;

    Ok(Json(StatsResponse {
        total_products,
        total_categories,
        avg_price,
        stock_value,
        category_stats,
    }))
}
