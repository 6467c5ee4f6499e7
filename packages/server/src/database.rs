use std::time::Duration;

use sea_orm::sea_query::{ColumnDef, SqliteQueryBuilder, Table, TableCreateStatement};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr,
    FromQueryResult, Statement,
};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{banner, category, product, schema_migration, setting, user};

/// Columns added after the first release. Each entry is applied with
/// `ALTER TABLE ... ADD COLUMN` when the column is missing.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] =
    &[("products", "stock", "INTEGER NOT NULL DEFAULT 0")];

/// Open the SQLite store and bring its schema up to date.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;

    Ok(db)
}

/// Create missing tables and add missing columns. Never drops or rewrites data.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    for stmt in table_statements() {
        db.execute_unprepared(&stmt.to_string(SqliteQueryBuilder))
            .await?;
    }

    for &(table, column, definition) in ADDITIVE_COLUMNS {
        let columns = table_columns(db, table).await?;
        if !columns.iter().any(|c| c == column) {
            db.execute_unprepared(&format!(
                "ALTER TABLE {table} ADD COLUMN {column} {definition}"
            ))
            .await?;
            info!("Added column {}.{}", table, column);
        }
    }

    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct TableColumn {
    name: String,
}

/// Column names of `table`, in declaration order.
pub async fn table_columns<C: ConnectionTrait>(db: &C, table: &str) -> Result<Vec<String>, DbErr> {
    let rows = TableColumn::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        format!("PRAGMA table_info({table})"),
    ))
    .all(db)
    .await?;

    Ok(rows.into_iter().map(|c| c.name).collect())
}

fn table_statements() -> Vec<TableCreateStatement> {
    vec![
        Table::create()
            .table(user::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(user::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(user::Column::Username)
                    .text()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(user::Column::Password).text().not_null())
            .to_owned(),
        Table::create()
            .table(category::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(category::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(category::Column::Name)
                    .text()
                    .not_null()
                    .unique_key(),
            )
            .to_owned(),
        // No FOREIGN KEY on category_id; references
        // are checked only when a category is deleted.
        Table::create()
            .table(product::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(product::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(product::Column::Name).text().not_null())
            .col(ColumnDef::new(product::Column::Price).double().not_null())
            .col(
                ColumnDef::new(product::Column::Stock)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(product::Column::Description).text().null())
            .col(ColumnDef::new(product::Column::CategoryId).integer().null())
            .col(ColumnDef::new(product::Column::Image).text().null())
            .to_owned(),
        Table::create()
            .table(banner::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(banner::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(banner::Column::Title).text().not_null())
            .col(ColumnDef::new(banner::Column::Subtitle).text().null())
            .col(ColumnDef::new(banner::Column::Image).text().null())
            .col(
                ColumnDef::new(banner::Column::Active)
                    .integer()
                    .not_null()
                    .default(1),
            )
            .to_owned(),
        Table::create()
            .table(setting::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(setting::Column::Key)
                    .text()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(setting::Column::Value).text().not_null())
            .to_owned(),
        Table::create()
            .table(schema_migration::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(schema_migration::Column::Version)
                    .text()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(schema_migration::Column::AppliedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned(),
    ]
}
