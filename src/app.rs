use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::{AppConfig, SecurityConfig, StorageBackend};
use crate::database::{DatabaseManager, DynProductRepository, InMemoryProductRepository, PgProductRepository};
use crate::handlers::{products, system};
use crate::middleware::normalize_errors;
use crate::services::ProductService;

/// Shared handler state. Cloned per request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductService>,
    pub public_base_url: Option<Arc<str>>,
}

impl AppState {
    pub fn new(repository: DynProductRepository, config: &AppConfig) -> Self {
        Self {
            service: Arc::new(ProductService::new(repository)),
            public_base_url: config.server.public_base_url.as_deref().map(Arc::from),
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()), config)
    }

    /// Connect the configured storage backend, applying the schema if enabled
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let repository: DynProductRepository = match config.database.storage {
            StorageBackend::Memory => {
                info!("Using in-memory product storage");
                Arc::new(InMemoryProductRepository::new())
            }
            StorageBackend::Postgres => {
                let pool = DatabaseManager::from_config(&config.database)
                    .await
                    .context("failed to connect to Postgres")?;
                if config.database.run_migrations {
                    DatabaseManager::migrate(&pool).await?;
                }
                info!("Using Postgres product storage");
                Arc::new(PgProductRepository::new(pool))
            }
        };

        Ok(Self::new(repository, config))
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(product_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(middleware::from_fn(normalize_errors));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        // Collection
        .route("/api/v1/products", get(products::list).post(products::create))
        // Single product
        .route(
            "/api/v1/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
}

/// Bind, serve until Ctrl-C/SIGTERM, then return
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;
    let app = router(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("Products API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Products API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
