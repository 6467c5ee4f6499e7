use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CategoryRequest {
    #[schema(example = "Books")]
    pub name: String,
}

/// Returns the trimmed name.
pub fn validate_category(payload: &CategoryRequest) -> Result<String, AppError> {
    validate_name(&payload.name, "Name")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Books")]
    pub name: String,
}

impl From<crate::entity::category::Model> for CategoryResponse {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}
