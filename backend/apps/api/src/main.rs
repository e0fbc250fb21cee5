//! API Server Entry Point
//!
//! Wires the auth and cart services into one axum server.
//! Uses `anyhow` for startup errors; request errors go through
//! `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::models::HealthResponse;
use auth::{AuthAppState, AuthConfig, PgUserRepository, auth_router};
use axum::{
    Json, Router,
    http::{self, Method, header},
    routing::get,
};
use cart::{CartAppState, PgCartRepository, cart_router};
use platform::config::{env_or, env_parse};
use platform::rate_limit::{InMemoryRateLimitStore, now_ms};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,cart=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    let pool = PgPoolOptions::new()
        .max_connections(env_parse("DATABASE_MAX_CONNECTIONS", 5))
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = AuthConfig::from_env()?;
    let allowed_origins: Vec<http::HeaderValue> = auth_config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let auth_state = AuthAppState::new(PgUserRepository::new(pool.clone()), auth_config);
    spawn_rate_limit_purge(auth_state.limiter.clone());

    let cart_state = CartAppState::new(PgCartRepository::new(pool));

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let app = Router::new()
        .route("/test", get(health))
        .merge(auth_router(auth_state))
        .merge(cart_router(cart_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let port: u16 = env_parse("PORT", 4000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(app_env = %env_or("APP_ENV", "development"), "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// GET /test
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running!".to_string(),
    })
}

/// Drop counters whose window has passed
fn spawn_rate_limit_purge(store: Arc<InMemoryRateLimitStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            store.purge_expired(now_ms());
        }
    });
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires; never resolves if it could not be installed
async fn wait_for_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
