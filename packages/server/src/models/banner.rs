use serde::{Deserialize, Serialize};

use super::shared::{FlagInput, validate_name};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BannerRequest {
    #[schema(example = "Summer sale")]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Boolean, number, or `"true"`/`"false"`/`"1"`/`"0"`.
    #[serde(default)]
    #[schema(value_type = Option<bool>, example = true)]
    pub active: Option<FlagInput>,
}

/// Banner fields after validation.
#[derive(Debug, PartialEq)]
pub struct BannerFields {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub active: bool,
}

/// Validate a banner body; `active_default` applies when `active` is absent.
pub fn validate_banner(payload: BannerRequest, active_default: bool) -> Result<BannerFields, AppError> {
    let title = validate_name(&payload.title, "Title")?;
    let active = match payload.active {
        Some(ref flag) => flag.to_bool("active")?,
        None => active_default,
    };

    Ok(BannerFields {
        title,
        subtitle: payload.subtitle,
        image: payload.image,
        active,
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BannerResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Summer sale")]
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    #[schema(example = true)]
    pub active: bool,
}

impl From<crate::entity::banner::Model> for BannerResponse {
    fn from(m: crate::entity::banner::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            subtitle: m.subtitle,
            image: m.image,
            active: m.active,
        }
    }
}
