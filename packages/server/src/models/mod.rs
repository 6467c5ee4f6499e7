pub mod auth;
pub mod banner;
pub mod category;
pub mod product;
pub mod settings;
pub mod shared;
pub mod stats;
pub mod upload;
