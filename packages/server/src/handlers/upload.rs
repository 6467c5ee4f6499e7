use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::Json;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::models::upload::UploadResponse;
use crate::state::AppState;
use crate::utils::filename::{attachment_disposition, validate_flat_filename};

/// Multipart field carrying the file.
const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = max_upload_size.saturating_add(MULTIPART_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Multipart error: {}", e.body_text()))
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores the `image` multipart field under a generated name and returns its public URL. The original extension is kept when it is short and alphanumeric.",
    request_body(content_type = "multipart/form-data", description = "Multipart form with an `image` file field"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing `image` field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(admin_id = auth_user.user_id))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        let name = state
            .uploads
            .put(IMAGE_FIELD, &original_name, &data)
            .await?;
        tracing::info!(name = %name, size = data.len(), "Stored upload");

        return Ok(Json(UploadResponse {
            image_url: format!("/uploads/{name}"),
        }));
    }

    Err(AppError::Validation(format!(
        "Missing '{IMAGE_FIELD}' field"
    )))
}

#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "Uploads",
    operation_id = "downloadUpload",
    summary = "Download an uploaded file",
    description = "Streams a file from the upload directory as an attachment. Only plain file names are accepted.",
    params(("filename" = String, Path, description = "Name returned by the upload endpoint")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Token invalid or expired (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = auth_user.user_id))]
pub async fn download_upload(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(filename): AppPath<String>,
) -> Result<Response, AppError> {
    let filename = validate_flat_filename(&filename)
        .map_err(|e| AppError::Validation(e.message().into()))?;

    let size = state.uploads.size(filename).await?;
    let reader = state.uploads.get_stream(filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(filename),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
