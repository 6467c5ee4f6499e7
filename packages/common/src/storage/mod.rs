mod error;
mod naming;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use naming::{generate_upload_name, is_safe_name, sanitized_extension};
pub use traits::{BoxReader, UploadStore};
