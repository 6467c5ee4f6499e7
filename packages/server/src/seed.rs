use chrono::Utc;
use sea_orm::*;
use tracing::{info, warn};

use crate::config::{AppConfig, BootstrapConfig, DEFAULT_ADMIN_PASSWORD, StoreDefaults};
use crate::entity::{schema_migration, setting, user};
use crate::utils::hash;

/// Account name used by early releases; removed at startup.
pub const LEGACY_ADMIN_USERNAME: &str = "admin";

/// Placeholder store names shipped by early releases.
const LEGACY_STORE_NAMES: &[&str] = &["Minha Loja", "Catálogo Online Pro"];

pub const REBRAND_LEGACY_STORE_NAME: &str = "2024_01_rebrand_legacy_store_name";

pub const BACKFILL_NULL_COLUMNS: &str = "2024_02_backfill_null_columns";

/// Data migrations in application order.
pub const DATA_MIGRATIONS: &[&str] = &[REBRAND_LEGACY_STORE_NAME, BACKFILL_NULL_COLUMNS];

/// Early stores declared every column nullable. Rows written by them are
/// rewritten so they decode under the current entities.
const NULL_BACKFILLS: &[&str] = &[
    "UPDATE products SET name = '' WHERE name IS NULL",
    "UPDATE products SET price = 0 WHERE typeof(price) NOT IN ('integer', 'real')",
    "UPDATE products SET stock = CASE WHEN typeof(stock) = 'real' THEN CAST(stock AS INTEGER) ELSE 0 END \
     WHERE typeof(stock) <> 'integer'",
    "UPDATE categories SET name = 'Untitled category ' || id WHERE name IS NULL",
    "UPDATE banners SET title = '' WHERE title IS NULL",
    "UPDATE banners SET active = 1 WHERE active IS NULL",
    "UPDATE settings SET value = '' WHERE value IS NULL",
    "UPDATE users SET password = '' WHERE password IS NULL",
];

/// Reconcile data migrations, accounts and default settings.
///
/// Migrations run first so later steps only ever see rows in the current
/// shape. Safe to run on every startup; a second run changes nothing.
pub async fn run(db: &DatabaseConnection, config: &AppConfig) -> Result<(), DbErr> {
    run_data_migrations(db, &config.store).await?;
    seed_admin(db, &config.bootstrap).await?;
    seed_settings(db, &config.store).await?;
    Ok(())
}

/// Create the configured administrator if absent and drop the legacy account.
pub async fn seed_admin(db: &DatabaseConnection, bootstrap: &BootstrapConfig) -> Result<(), DbErr> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&bootstrap.admin_username))
        .one(db)
        .await?;

    if existing.is_none() {
        let password = hash::hash_password(&bootstrap.admin_password)
            .map_err(|e| DbErr::Custom(format!("Failed to hash admin password: {e}")))?;

        user::ActiveModel {
            username: Set(bootstrap.admin_username.clone()),
            password: Set(password),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("Seeded administrator account {}", bootstrap.admin_username);
    }

    if bootstrap.admin_password == DEFAULT_ADMIN_PASSWORD {
        warn!("Administrator password is the built-in default; set CATALOG__BOOTSTRAP__ADMIN_PASSWORD");
    }

    if bootstrap.admin_username != LEGACY_ADMIN_USERNAME {
        let res = user::Entity::delete_many()
            .filter(user::Column::Username.eq(LEGACY_ADMIN_USERNAME))
            .exec(db)
            .await?;
        if res.rows_affected > 0 {
            info!("Removed legacy administrator account");
        }
    }

    Ok(())
}

/// Write the default settings when the table is empty.
///
/// Returns `true` if the defaults were written.
pub async fn seed_settings(db: &DatabaseConnection, store: &StoreDefaults) -> Result<bool, DbErr> {
    if setting::Entity::find().count(db).await? > 0 {
        return Ok(false);
    }

    let defaults = [
        (setting::STORE_NAME, &store.store_name),
        (setting::PRIMARY_COLOR, &store.primary_color),
        (setting::LAYOUT_MODE, &store.layout_mode),
        (setting::FONT_FAMILY, &store.font_family),
    ];

    let txn = db.begin().await?;
    for (key, value) in defaults {
        setting::upsert(&txn, key, value).await?;
    }
    txn.commit().await?;

    info!("Seeded {} default settings", defaults.len());
    Ok(true)
}

/// Apply each pending data migration once and record it.
///
/// On an empty store every migration is a no-op and is only recorded.
pub async fn run_data_migrations(
    db: &DatabaseConnection,
    store: &StoreDefaults,
) -> Result<(), DbErr> {
    for &version in DATA_MIGRATIONS {
        if schema_migration::Entity::find_by_id(version)
            .one(db)
            .await?
            .is_some()
        {
            continue;
        }

        let txn = db.begin().await?;
        apply_data_migration(&txn, version, store).await?;
        schema_migration::ActiveModel {
            version: Set(version.to_string()),
            applied_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!("Applied data migration {}", version);
    }

    Ok(())
}

async fn apply_data_migration(
    txn: &DatabaseTransaction,
    version: &str,
    store: &StoreDefaults,
) -> Result<(), DbErr> {
    match version {
        REBRAND_LEGACY_STORE_NAME => rebrand_legacy_store_name(txn, store).await,
        BACKFILL_NULL_COLUMNS => backfill_null_columns(txn).await,
        other => Err(DbErr::Custom(format!("Unknown data migration {other}"))),
    }
}

// TODO: drop this step once no deployment predates the 2024 rebrand.
async fn rebrand_legacy_store_name(
    txn: &DatabaseTransaction,
    store: &StoreDefaults,
) -> Result<(), DbErr> {
    let current = setting::Entity::find_by_id(setting::STORE_NAME)
        .one(txn)
        .await?;

    let Some(current) = current else {
        return Ok(());
    };
    if !LEGACY_STORE_NAMES.contains(&current.value.as_str()) {
        return Ok(());
    }

    setting::upsert(txn, setting::STORE_NAME, &store.store_name).await?;
    setting::upsert(txn, setting::PRIMARY_COLOR, &store.primary_color).await?;

    info!(
        "Replaced legacy store name {:?} with {:?}",
        current.value, store.store_name
    );
    Ok(())
}

async fn backfill_null_columns(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let mut rewritten = 0;
    for sql in NULL_BACKFILLS {
        rewritten += txn.execute_unprepared(sql).await?.rows_affected();
    }
    if rewritten > 0 {
        info!("Backfilled {} legacy rows with NULL columns", rewritten);
    }
    Ok(())
}
