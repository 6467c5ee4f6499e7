use serde::Serialize;

/// Public location of a stored upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    #[schema(example = "/uploads/image-1717171717171-123456789.png")]
    pub image_url: String,
}
