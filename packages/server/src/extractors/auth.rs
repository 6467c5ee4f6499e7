use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated administrator extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Extraction runs
/// before the handler body, so a rejected request never reaches the store.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

/// Split an `Authorization` header value into its token.
///
/// No token part at all counts as a missing credential; a token under any
/// scheme other than `Bearer` counts as an invalid one.
fn bearer_token(value: &str) -> Result<&str, AppError> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AppError::TokenMissing)?;
    let token = parts.next().ok_or(AppError::TokenMissing)?;

    if !scheme.eq_ignore_ascii_case("Bearer") || parts.next().is_some() {
        return Err(AppError::TokenInvalid);
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::TokenMissing)?
            .to_str()
            .map_err(|_| AppError::TokenInvalid)?;

        let token = bearer_token(auth_header)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::TokenInvalid
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
        })
    }
}
