use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Well-known keys; any other key is stored as-is.
pub const STORE_NAME: &str = "storeName";
pub const PRIMARY_COLOR: &str = "primaryColor";
pub const LAYOUT_MODE: &str = "layoutMode";
pub const FONT_FAMILY: &str = "fontFamily";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert `key` or overwrite its value.
pub async fn upsert<C: ConnectionTrait>(db: &C, key: &str, value: &str) -> Result<(), DbErr> {
    Entity::insert(ActiveModel {
        key: Set(key.to_owned()),
        value: Set(value.to_owned()),
    })
    .on_conflict(
        sea_orm::sea_query::OnConflict::column(Column::Key)
            .update_column(Column::Value)
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Ok(())
}
