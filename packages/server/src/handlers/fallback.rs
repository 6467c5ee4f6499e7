use axum::http::Uri;

use crate::error::AppError;

/// Unmatched `/api/*` paths get a JSON 404 instead of the SPA shell.
pub async fn api_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No API route for {}", uri.path()))
}
