use sea_orm::FromQueryResult;
use serde::Serialize;

/// Number of products in one category.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct CategoryStat {
    #[schema(example = "Books")]
    pub name: String,
    #[schema(example = 2)]
    pub count: i64,
}

/// Dashboard aggregates.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[schema(example = 2)]
    pub total_products: u64,
    #[schema(example = 2)]
    pub total_categories: u64,
    /// Mean product price; 0 when there are no products.
    #[schema(example = 20.0)]
    pub avg_price: f64,
    /// Sum of price × stock.
    #[schema(example = 140.0)]
    pub stock_value: f64,
    /// Every category, including those without products.
    pub category_stats: Vec<CategoryStat>,
}
