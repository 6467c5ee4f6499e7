use sea_orm::{ConnectionTrait, Database, EntityTrait, PaginatorTrait};
use serde_json::json;

use catalog_server::database::init_db;
use catalog_server::entity::{schema_migration, setting, user};
use catalog_server::seed;

use crate::common::{ADMIN_USERNAME, TestApp, routes, test_config};

/// Schema and rows as written by the first releases: nullable columns, a
/// foreign key on `category_id`, bcrypt password hashes.
const FIRST_RELEASE_STORE: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE,
        password TEXT
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        price REAL,
        stock INTEGER DEFAULT 0,
        description TEXT,
        category_id INTEGER,
        image TEXT,
        FOREIGN KEY (category_id) REFERENCES categories (id)
    )",
    "CREATE TABLE IF NOT EXISTS banners (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        subtitle TEXT,
        image TEXT,
        active INTEGER DEFAULT 1
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT
    )",
    "INSERT INTO categories (name) VALUES ('Books')",
    "INSERT INTO products (name, price, stock, category_id) VALUES (NULL, 2.0, 0, 1)",
    "INSERT INTO products (name, price, stock) VALUES ('Globe', NULL, NULL)",
    "INSERT INTO banners (title, active) VALUES (NULL, 1)",
    "INSERT INTO settings (key, value) VALUES ('storeName', 'Minha Loja')",
    "INSERT INTO settings (key, value) VALUES ('banner', NULL)",
    "INSERT INTO users (username, password) VALUES
        ('legacy@shop.local', '$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy')",
];

#[tokio::test]
async fn repeated_startup_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    for _ in 0..2 {
        let db = init_db(&config.database).await.unwrap();
        seed::run(&db, &config).await.unwrap();
    }

    let db = init_db(&config.database).await.unwrap();
    let users = user::Entity::find().all(&db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, ADMIN_USERNAME);
    assert_ne!(users[0].password, crate::common::ADMIN_PASSWORD);
    assert_eq!(setting::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(
        schema_migration::Entity::find().count(&db).await.unwrap(),
        seed::DATA_MIGRATIONS.len() as u64
    );
}

#[tokio::test]
async fn legacy_store_is_upgraded_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    // A store created before the stock column, the admin reconciliation
    // and the rebrand existed.
    let db = init_db(&config.database).await.unwrap();
    for sql in [
        "DROP TABLE products",
        "CREATE TABLE products (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL,
             price REAL NOT NULL,
             description TEXT,
             category_id INTEGER,
             image TEXT
         )",
        "INSERT INTO products (name, price) VALUES ('Old stock', 9.5)",
        "INSERT INTO users (username, password) VALUES ('admin', 'admin123')",
        "INSERT INTO settings (key, value) VALUES
             ('storeName', 'Minha Loja'),
             ('primaryColor', '#000000'),
             ('layoutMode', 'list')",
    ] {
        db.execute_unprepared(sql).await.unwrap();
    }
    drop(db);

    let db = init_db(&config.database).await.unwrap();
    seed::run(&db, &config).await.unwrap();

    let usernames: Vec<String> = user::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(usernames, vec![ADMIN_USERNAME.to_string()]);

    let settings: std::collections::BTreeMap<String, String> = setting::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();
    assert_eq!(settings["storeName"], config.store.store_name);
    assert_eq!(settings["primaryColor"], config.store.primary_color);
    assert_eq!(settings["layoutMode"], "list");

    let columns = catalog_server::database::table_columns(&db, "products")
        .await
        .unwrap();
    assert!(columns.iter().any(|c| c == "stock"));
    let old = catalog_server::entity::product::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old.name, "Old stock");
    assert_eq!(old.stock, 0);
}

#[tokio::test]
async fn first_release_store_is_served_after_upgrade() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let raw = Database::connect(config.database.url.as_str()).await.unwrap();
    for sql in FIRST_RELEASE_STORE {
        raw.execute_unprepared(sql).await.unwrap();
    }
    drop(raw);

    let app = TestApp::spawn_in(dir).await;

    let products = app.get_without_token(routes::PRODUCTS).await;
    assert_eq!(products.status, 200, "{}", products.text);
    assert_eq!(products.body[0]["name"], "");
    assert_eq!(products.body[0]["category"], "Books");
    assert_eq!(products.body[1]["name"], "Globe");
    assert_eq!(products.body[1]["price"], 0.0);
    assert_eq!(products.body[1]["stock"], 0);

    let settings = app.get_without_token(routes::SETTINGS).await;
    assert_eq!(settings.status, 200, "{}", settings.text);
    assert_eq!(settings.body["banner"], "");
    assert_eq!(settings.body["storeName"], app.config.store.store_name.as_str());

    let banners = app.get_without_token(routes::BANNERS).await;
    assert_eq!(banners.status, 200, "{}", banners.text);
    assert_eq!(banners.body[0]["title"], "");

    let token = app.login().await;
    let stats = app.get_with_token(routes::STATS, &token).await;
    assert_eq!(stats.status, 200, "{}", stats.text);
    assert_eq!(stats.body["totalProducts"], 2);

    let legacy_login = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "legacy@shop.local", "password": "anything"}),
        )
        .await;
    assert_eq!(legacy_login.status, 401);
    assert_eq!(legacy_login.body["code"], "INVALID_CREDENTIALS");
}
