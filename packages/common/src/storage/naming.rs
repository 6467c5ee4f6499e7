use std::path::Path;

use chrono::Utc;
use rand::Rng;

/// Longest extension carried over from the client's filename.
const MAX_EXTENSION_LEN: usize = 10;

/// Generate a collision-resistant name for a new upload.
///
/// Format: `{field}-{unix millis}-{random 0..1e9}[.{ext}]`.
pub fn generate_upload_name(field: &str, original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);

    match sanitized_extension(original_name) {
        Some(ext) => format!("{field}-{millis}-{suffix}.{ext}"),
        None => format!("{field}-{millis}-{suffix}"),
    }
}

/// Lowercased extension of `name`, if it is short and purely alphanumeric.
pub fn sanitized_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `name` denotes a plain file directly inside the upload directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.chars().any(|c| c.is_ascii_control())
}
