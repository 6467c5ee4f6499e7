use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use catalog_server::config::{
    AppConfig, AuthConfig, BootstrapConfig, DatabaseConfig, FrontendConfig, ServerConfig,
    StorageConfig, StoreDefaults,
};
use catalog_server::state::AppState;
use ::common::storage::filesystem::FilesystemUploadStore;

pub const ADMIN_USERNAME: &str = "owner@test.local";
pub const ADMIN_PASSWORD: &str = "integration-pass";
pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const SPA_SHELL: &str = "<!doctype html><title>catalog</title>";

pub mod routes {
    pub const LOGIN: &str = "/api/login";
    pub const ME: &str = "/api/me";
    pub const PRODUCTS: &str = "/api/products";
    pub const CATEGORIES: &str = "/api/categories";
    pub const BANNERS: &str = "/api/banners";
    pub const ADMIN_BANNERS: &str = "/api/admin/banners";
    pub const SETTINGS: &str = "/api/settings";
    pub const STATS: &str = "/api/stats";
    pub const UPLOAD: &str = "/api/upload";

    pub fn product(id: i32) -> String {
        format!("/api/products/{id}")
    }

    pub fn category(id: i32) -> String {
        format!("/api/categories/{id}")
    }

    pub fn banner(id: i32) -> String {
        format!("/api/banners/{id}")
    }

    pub fn download(filename: &str) -> String {
        format!("/api/download/{filename}")
    }
}

/// Configuration pointing every path into `dir`.
pub fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Default::default()
        },
        database: DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display()),
            max_connections: 5,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_hours: 24,
        },
        storage: StorageConfig {
            upload_dir: dir.path().join("uploads"),
            max_upload_size: 1024 * 1024,
        },
        frontend: FrontendConfig {
            dist_dir: dir.path().join("dist"),
        },
        bootstrap: BootstrapConfig {
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        },
        store: StoreDefaults::default(),
    }
}

/// A running test server backed by a fresh SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self::spawn_in(dir).await
    }

    /// Start the server over `dir`, keeping any store already created there.
    pub async fn spawn_in(dir: TempDir) -> Self {
        std::fs::create_dir_all(dir.path().join("dist")).expect("Failed to create dist dir");
        std::fs::write(dir.path().join("dist/index.html"), SPA_SHELL)
            .expect("Failed to write SPA shell");

        let config = test_config(&dir);

        let db = catalog_server::database::init_db(&config.database)
            .await
            .expect("Failed to initialize database");
        catalog_server::seed::run(&db, &config)
            .await
            .expect("Failed to bootstrap database");

        let uploads = FilesystemUploadStore::new(
            config.storage.upload_dir.clone(),
            config.storage.max_upload_size,
        )
        .await
        .expect("Failed to create upload store");

        let state = AppState {
            db: db.clone(),
            config: config.clone(),
            uploads: Arc::new(uploads),
        };

        let app = catalog_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir: config.storage.upload_dir.clone(),
            config,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST with an arbitrary `Authorization` header value.
    pub async fn post_with_auth_header(&self, path: &str, body: &Value, header: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", header)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn put_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Send a multipart form with one file part named `field`.
    pub async fn upload_with_token(
        &self,
        field: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(routes::UPLOAD))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Log in as the bootstrap administrator and return the token.
    pub async fn login(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({
                    "username": ADMIN_USERNAME,
                    "password": ADMIN_PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a category via the API and return its `id`.
    pub async fn create_category(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_with_token(routes::CATEGORIES, &serde_json::json!({"name": name}), token)
            .await;
        assert_eq!(res.status, 200, "create_category failed: {}", res.text);
        res.id()
    }

    /// Create a product via the API and return its `id`.
    pub async fn create_product(&self, token: &str, body: &Value) -> i32 {
        let res = self.post_with_token(routes::PRODUCTS, body, token).await;
        assert_eq!(res.status, 200, "create_product failed: {}", res.text);
        res.id()
    }

    /// Create a banner via the API and return its `id`.
    pub async fn create_banner(&self, token: &str, body: &Value) -> i32 {
        let res = self.post_with_token(routes::BANNERS, body, token).await;
        assert_eq!(res.status, 200, "create_banner failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
