//! # jotter: a small notes API with per-user ownership
//!
//! `jotter` stores short text notes in PostgreSQL and serves them over a JSON HTTP API. Every
//! note belongs to the user who created it; callers can only ever see or delete their own notes.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL (through [sqlx]) for persistence.
//!
//! - The **API layer** ([`api`]) holds the route handlers and the request/response models,
//!   including field-level validation of request bodies.
//! - The **authentication layer** ([`auth`]) verifies bearer access tokens and resolves them to
//!   a [`CurrentUser`](api::models::users::CurrentUser); it also hashes passwords at sign-up.
//! - The **database layer** ([`db`]) uses the repository pattern. Notes go through the
//!   owner-scoped [`OwnedRepository`](db::handlers::OwnedRepository) trait, so every query
//!   filters on the author at the data layer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use jotter::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = jotter::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     jotter::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations run automatically on startup. To run them by hand:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! jotter::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::{CorsOrigin, PoolSettings};
use crate::openapi::ApiDoc;
use axum::{
    Router,
    http::{self, HeaderValue, Method},
    routing::{delete, get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{NoteId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the jotter database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(secs(settings.idle_timeout_secs))
        .max_lifetime(secs(settings.max_lifetime_secs))
}

/// Connect to PostgreSQL and bring the schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = pool_options(&config.database.pool).connect(&config.database.url).await?;
    migrator().run(&pool).await?;
    info!("Database migrations applied");
    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the bare origin, without path or trailing slash
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// Routes are mounted at the root: the notes API, WhoAmI and sign-up, a health probe, the
/// OpenAPI reference at `/docs`, and Prometheus metrics at `/internal/metrics` when enabled.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route(
            "/notes/",
            get(api::handlers::notes::list_notes).post(api::handlers::notes::create_note),
        )
        .route("/notes/delete/{id}/", delete(api::handlers::notes::delete_note))
        .route("/user/", get(api::handlers::users::get_current_user))
        .route("/user/register/", post(api::handlers::users::register))
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service: database pool, router and configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database and runs migrations
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests drain, the pool is
///    closed and pending spans are flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application on an existing pool, or connect one from `config` if `None`.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!(
            "Starting jotter on {} (metrics: {}, registration: {})",
            config.bind_address(),
            config.enable_metrics,
            config.auth.allow_registration
        );

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Jotter listening on http://{}", bind_addr);

        // Run the server with graceful shutdown
        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    fn test_server(pool: PgPool, config: Config) -> axum_test::TestServer {
        let app_state = AppState::builder().db(pool).config(config).build();
        let router = build_router(&app_state).expect("Failed to build router");
        axum_test::TestServer::new(router).expect("Failed to create test server")
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_docs_served(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/docs").await;
        response.assert_status_ok();
        assert!(response.text().contains("<html"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_route_is_not_found(pool: PgPool) {
        let server = create_test_app(pool).await;
        server.get("/notes").await.assert_status(StatusCode::NOT_FOUND);
        server.get("/admin").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cors_allows_configured_origin(pool: PgPool) {
        let mut config = create_test_config();
        config.auth.security.cors.allowed_origins = vec![CorsOrigin::Url("https://notes.example.com".parse().unwrap())];
        let server = test_server(pool, config);

        let response = server.get("/healthz").add_header("origin", "https://notes.example.com").await;
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("https://notes.example.com"))
        );

        let response = server.get("/healthz").add_header("origin", "https://evil.example.com").await;
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_metrics_disabled_by_default(pool: PgPool) {
        let server = create_test_app(pool).await;
        server.get("/internal/metrics").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_metrics_enabled(pool: PgPool) {
        let mut config = create_test_config();
        config.enable_metrics = true;
        let server = test_server(pool, config);

        server.get("/healthz").await.assert_status_ok();

        let metrics_response = server.get("/internal/metrics").await;
        metrics_response.assert_status_ok();
        let metrics_content = metrics_response.text();
        assert!(metrics_content.contains("# HELP") || metrics_content.contains("# TYPE"));
    }

    #[test]
    fn test_pool_options_zero_means_never() {
        let settings = PoolSettings {
            idle_timeout_secs: 0,
            max_lifetime_secs: 0,
            ..Default::default()
        };
        let options = pool_options(&settings);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
        assert_eq!(options.get_max_connections(), 10);
    }
}
