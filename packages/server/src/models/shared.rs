use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body returned after creating a row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IdResponse {
    /// ID of the new row.
    #[schema(example = 1)]
    pub id: i32,
}

/// Body returned after an update or delete.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    #[schema(example = true)]
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// A number sent either as a JSON number or as a numeric string.
#[derive(Deserialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// `true` for an empty (or whitespace-only) string.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Parse to a finite number; `field` names the value in error messages.
    pub fn to_f64(&self, field: &str) -> Result<f64, AppError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation(format!("{field} must be a number")))?,
        };
        if !value.is_finite() {
            return Err(AppError::Validation(format!("{field} must be a number")));
        }
        Ok(value)
    }

    /// Parse to a non-negative whole number that fits in `i32`.
    pub fn to_count(&self, field: &str) -> Result<i32, AppError> {
        let value = self.to_f64(field)?;
        if value < 0.0 {
            return Err(AppError::Validation(format!("{field} must be >= 0")));
        }
        if value.fract() != 0.0 || value > f64::from(i32::MAX) {
            return Err(AppError::Validation(format!(
                "{field} must be a whole number"
            )));
        }
        Ok(value as i32)
    }
}

/// A flag sent as a JSON boolean, a number, or `"true"`/`"false"`/`"1"`/`"0"`.
#[derive(Deserialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FlagInput {
    pub fn to_bool(&self, field: &str) -> Result<bool, AppError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Number(n) => Ok(*n != 0.0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(AppError::Validation(format!("{field} must be a boolean"))),
            },
        }
    }
}

/// Validate a trimmed display name (1-256 Unicode characters).
pub fn validate_name(name: &str, field: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(name.to_string())
}
