use catalog_server::utils::jwt;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::common::{ADMIN_PASSWORD, ADMIN_USERNAME, JWT_SECRET, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn administrator_can_login_and_receives_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200);
        let token = res.body["token"].as_str().unwrap();
        let claims = jwt::verify(token, JWT_SECRET).unwrap();
        assert_eq!(claims.sub, ADMIN_USERNAME);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let app = TestApp::spawn().await;

        let wrong_password = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": "nope"}),
            )
            .await;
        let unknown_user = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ghost", "password": "nope"}),
            )
            .await;

        assert_eq!(wrong_password.status, 401);
        assert_eq!(unknown_user.status, 401);
        assert_eq!(wrong_password.body, unknown_user.body);
        assert_eq!(wrong_password.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn account_with_foreign_hash_format_looks_like_unknown_user() {
        use sea_orm::ConnectionTrait;

        let app = TestApp::spawn().await;
        app.db
            .execute_unprepared(
                "INSERT INTO users (username, password) VALUES \
                 ('bcrypt@shop.local', '$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy')",
            )
            .await
            .unwrap();

        let carried_over = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "bcrypt@shop.local", "password": "wrong"}),
            )
            .await;
        let unknown = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody@shop.local", "password": "wrong"}),
            )
            .await;

        assert_eq!(carried_over.status, 401);
        assert_eq!(carried_over.body["code"], "INVALID_CREDENTIALS");
        assert_eq!(carried_over.body, unknown.body);
    }

    #[tokio::test]
    async fn legacy_admin_account_cannot_login() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "admin", "password": "admin123"}),
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn empty_credentials_are_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": "", "password": ""}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": ADMIN_USERNAME}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod token_gate {
    use super::*;

    #[tokio::test]
    async fn me_returns_identity_for_valid_token() {
        let app = TestApp::spawn().await;
        let token = app.login().await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], ADMIN_USERNAME);
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::CATEGORIES, &json!({"name": "Books"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn header_without_token_part_is_401() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_auth_header(routes::CATEGORIES, &json!({"name": "Books"}), "Bearer")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn malformed_token_is_403() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(routes::CATEGORIES, &json!({"name": "Books"}), "not-a-jwt")
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn wrong_scheme_is_403() {
        let app = TestApp::spawn().await;
        let token = app.login().await;

        let res = app
            .post_with_auth_header(
                routes::CATEGORIES,
                &json!({"name": "Books"}),
                &format!("Basic {token}"),
            )
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_403() {
        let app = TestApp::spawn().await;
        let forged = jwt::sign(1, ADMIN_USERNAME, "some-other-secret", Duration::hours(24)).unwrap();

        let res = app.get_with_token(routes::STATS, &forged).await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn expired_token_is_403_and_nothing_is_written() {
        let app = TestApp::spawn().await;
        let expired = jwt::sign_at(
            1,
            ADMIN_USERNAME,
            JWT_SECRET,
            Duration::hours(24),
            Utc::now() - Duration::hours(25),
        )
        .unwrap();

        let res = app
            .post_with_token(routes::CATEGORIES, &json!({"name": "Books"}), &expired)
            .await;
        assert_eq!(res.status, 403);

        let list = app.get_without_token(routes::CATEGORIES).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn token_within_validity_is_accepted() {
        let app = TestApp::spawn().await;
        let token = jwt::sign_at(
            1,
            ADMIN_USERNAME,
            JWT_SECRET,
            Duration::hours(24),
            Utc::now() - Duration::hours(23),
        )
        .unwrap();

        let res = app.get_with_token(routes::STATS, &token).await;

        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn every_protected_route_rejects_anonymous_requests() {
        let app = TestApp::spawn().await;
        let body = json!({});

        let responses = vec![
            app.post_without_token(routes::PRODUCTS, &body).await,
            app.put_without_token(&routes::product(1), &body).await,
            app.delete_without_token(&routes::product(1)).await,
            app.post_without_token(routes::CATEGORIES, &body).await,
            app.put_without_token(&routes::category(1), &body).await,
            app.delete_without_token(&routes::category(1)).await,
            app.post_without_token(routes::BANNERS, &body).await,
            app.put_without_token(&routes::banner(1), &body).await,
            app.delete_without_token(&routes::banner(1)).await,
            app.get_without_token(routes::ADMIN_BANNERS).await,
            app.post_without_token(routes::SETTINGS, &body).await,
            app.get_without_token(routes::STATS).await,
            app.post_without_token(routes::UPLOAD, &body).await,
            app.get_without_token(&routes::download("x.png")).await,
            app.get_without_token(routes::ME).await,
        ];

        for res in responses {
            assert_eq!(res.status, 401, "unexpected response: {}", res.text);
            assert_eq!(res.body["code"], "TOKEN_MISSING");
        }
    }
}
