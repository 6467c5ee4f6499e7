use std::sync::Arc;

use anyhow::Context;
use catalog_server::config::AppConfig;
use catalog_server::state::AppState;
use catalog_server::{build_router, database, seed};
use common::storage::filesystem::FilesystemUploadStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info for our crates if RUST_LOG is not set.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_server=info,common=info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to open database")?;
    seed::run(&db, &config)
        .await
        .context("Bootstrap failed")?;
    info!("Database ready");

    let uploads = FilesystemUploadStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to prepare upload directory")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        uploads: Arc::new(uploads),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Catalog server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
