use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{NumericInput, validate_name};
use crate::error::AppError;

/// Body of product create and update requests.
///
/// Numeric fields accept JSON numbers or numeric strings. An empty string
/// or `null` leaves `stock` at 0 and `category_id` unset.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Atlas")]
    pub name: String,
    #[schema(value_type = f64, example = 30)]
    pub price: NumericInput,
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 3)]
    pub stock: Option<NumericInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 1)]
    pub category_id: Option<NumericInput>,
    /// Absolute URL or `/uploads/...` path.
    #[serde(default)]
    pub image: Option<String>,
}

/// Product fields after coercion and validation.
#[derive(Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

pub fn validate_product(payload: ProductRequest) -> Result<ProductFields, AppError> {
    let name = validate_name(&payload.name, "Name")?;

    let price = payload.price.to_f64("price")?;
    if price < 0.0 {
        return Err(AppError::Validation("price must be >= 0".into()));
    }

    let stock = match payload.stock {
        Some(ref s) if !s.is_blank() => s.to_count("stock")?,
        _ => 0,
    };

    let category_id = match payload.category_id {
        Some(ref c) if !c.is_blank() => {
            let id = c.to_count("category_id")?;
            if id == 0 {
                return Err(AppError::Validation(
                    "category_id must be a positive integer".into(),
                ));
            }
            Some(id)
        }
        _ => None,
    };

    Ok(ProductFields {
        name,
        price,
        stock,
        description: payload.description,
        category_id,
        image: payload.image,
    })
}

/// Product row joined with its category name.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProductListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Atlas")]
    pub name: String,
    #[schema(example = 30.0)]
    pub price: f64,
    #[schema(example = 3)]
    pub stock: i32,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
    /// Name of the referenced category; `null` if unset or dangling.
    #[schema(example = "Books")]
    pub category: Option<String>,
}
