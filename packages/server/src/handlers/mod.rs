pub mod auth;
pub mod banner;
pub mod category;
pub mod fallback;
pub mod product;
pub mod settings;
pub mod stats;
pub mod upload;
