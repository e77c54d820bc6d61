pub mod extract;
pub mod response;

use crate::auth::session;
use crate::config::{AuthConfig, Config};
use crate::db;
use crate::features;
use crate::middleware;
use axum::{extract::FromRef, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower_http::compression::CompressionLayer;

/// State shared by every handler
///
/// Handlers extract only the part they need (`State<SqlitePool>`,
/// `State<AuthConfig>`).
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            auth: config.auth.clone(),
        }
    }
}

/// Open the database, apply migrations and serve until a shutdown signal
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let db = db::create_pool(&config.database).await?;
    db::run_migrations(&db).await?;

    let purged = session::purge_expired(&db).await?;
    tracing::info!(purged, "Expired sessions removed");

    let app = create_router(AppState::new(db, &config), &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", features::router())
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Folio",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match db::health_check(&pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "healthy", "database": "connected"}))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy", "database": "disconnected"})),
            )
        },
    }
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }

    // Hard stop if in-flight requests do not drain in time
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!(timeout_secs, "Shutdown timeout elapsed, exiting");
        std::process::exit(1);
    });
}
