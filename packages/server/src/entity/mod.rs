pub mod banner;
pub mod category;
pub mod product;
pub mod schema_migration;
pub mod setting;
pub mod user;
