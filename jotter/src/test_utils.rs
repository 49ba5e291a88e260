//! Shared fixtures for database and HTTP tests.

use crate::{
    auth::session,
    config::{AuthConfig, Config, PasswordConfig},
    db::{handlers::Users, models::users::UserCreateDBRequest, models::users::UserDBResponse},
};
use axum_test::TestServer;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_config(pool, create_test_config()).await
}

pub async fn create_test_app_with_config(pool: PgPool, config: Config) -> TestServer {
    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-notes".to_string()),
        auth: AuthConfig {
            password: PasswordConfig {
                // Cheap hashing keeps sign-up tests fast
                argon2_memory_kib: 128,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

pub async fn create_test_user(pool: &PgPool) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users_repo = Users::new(&mut conn);
    let username = format!("testuser_{}", Uuid::new_v4().simple());

    let user_create = UserCreateDBRequest {
        username,
        password_hash: "$argon2id$v=19$m=128,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
    };

    users_repo.create(&user_create).await.expect("Failed to create test user")
}

/// `Authorization` header carrying a valid access token for `user`.
pub fn auth_header(user: &UserDBResponse) -> (String, String) {
    let token = session::create_access_token(&user.clone().into(), &create_test_config()).expect("Failed to create access token");
    ("authorization".to_string(), format!("Bearer {token}"))
}
