//! HTTP CRUD service for todo items.
//!
//! # Overview
//! Layers, leaves first: `db` opens the SQLite pool and creates the schema,
//! `repository` holds the SQL, `service` enforces the business rules, and
//! `routes` maps HTTP onto the service.
//!
//! # Design
//! - Composition is explicit: pool → `TodoService` → router, wired once at
//!   startup in [`serve`].
//! - The service keeps no state between requests beyond the pool handle.
//! - Errors are typed; only `NotFound` becomes a 404, storage failures are 500s.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ServiceError, ServiceResult, StartupError};
pub use models::{ListFilter, ListParams, Todo, TodoPayload};
pub use service::TodoService;

/// Bare application router over `service`, without middleware.
pub fn app(service: TodoService) -> Router {
    routes::router().with_state(service)
}

/// Application router with CORS for `cors_origin` and request tracing.
pub fn build_router(service: TodoService, cors_origin: &str) -> Result<Router, StartupError> {
    let origin = HeaderValue::from_str(cors_origin)
        .map_err(|_| StartupError::InvalidOrigin(cors_origin.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(app(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Open storage, wire the layers together and serve until shutdown.
pub async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    tracing::info!(database_url = %config.database_url, "storage ready");

    let service = TodoService::new(pool.clone());
    let app = build_router(service, &config.cors_origin)?;

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("listening on {}", config.bind);

    run(listener, app).await?;

    pool.close().await;
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
