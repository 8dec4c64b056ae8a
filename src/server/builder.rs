//! ServerBuilder for fluent API to build the dashboard HTTP server

use super::handlers::AppState;
use super::router::build_api_routes;
use crate::config::{DashboardConfig, StorageBackend};
use crate::core::executor::QueryExecutor;
use crate::core::store::TransactionStore;
use crate::storage::InMemoryTransactionStore;
use anyhow::{Result, anyhow};
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Hardening headers added to every response unless a handler set them
const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
];

/// Builder for the dashboard API server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(DashboardConfig::default())
///     .with_store(InMemoryTransactionStore::from_json_file("sales.json")?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn TransactionStore>>,
    config: DashboardConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            store: None,
            config: DashboardConfig::default(),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the record store (required)
    pub fn with_store(mut self, store: impl TransactionStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared record store
    pub fn with_shared_store(mut self, store: Arc<dyn TransactionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open the store selected by the configuration
    ///
    /// The in-memory backend is seeded from `storage.seed_file` when set.
    /// The MongoDB backend requires the `mongodb_backend` feature.
    pub async fn with_configured_store(self) -> Result<Self> {
        let storage = &self.config.storage;
        let store: Arc<dyn TransactionStore> = match storage.backend {
            StorageBackend::InMemory => match &storage.seed_file {
                Some(path) => {
                    let store = InMemoryTransactionStore::from_json_file(path)?;
                    if store.is_empty()? {
                        tracing::warn!(seed_file = %path, "Seed file holds no records");
                    }
                    Arc::new(store)
                }
                None => {
                    tracing::warn!("No seed file configured, serving an empty in-memory store");
                    Arc::new(InMemoryTransactionStore::new())
                }
            },
            #[cfg(feature = "mongodb_backend")]
            StorageBackend::Mongodb => {
                let uri = storage
                    .uri
                    .as_deref()
                    .ok_or_else(|| anyhow!("storage.uri is required for the mongodb backend"))?;
                let database = self
                    .config
                    .database_name()
                    .ok_or_else(|| anyhow!("No database named in storage.database or the URI"))?;
                Arc::new(
                    crate::storage::MongoTransactionStore::connect(
                        uri,
                        &database,
                        &storage.collection,
                    )
                    .await?,
                )
            }
            #[cfg(not(feature = "mongodb_backend"))]
            StorageBackend::Mongodb => {
                return Err(anyhow!(
                    "The mongodb backend requires the 'mongodb_backend' feature"
                ));
            }
        };

        tracing::info!(backend = store.backend_name(), "Record store ready");
        Ok(self.with_shared_store(store))
    }

    fn cors_layer(&self) -> Result<CorsLayer> {
        let origin = self.config.cors_origin.trim();
        let layer = CorsLayer::new().allow_methods([Method::GET]).allow_headers(Any);

        if origin == "*" {
            return Ok(layer.allow_origin(Any));
        }

        let origin: HeaderValue = origin
            .parse()
            .map_err(|e| anyhow!("Invalid CORS origin '{}': {}", origin, e))?;
        Ok(layer.allow_origin(origin))
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("Record store is required"))?;
        let cors = self.cors_layer()?;

        let state = AppState {
            executor: QueryExecutor::new(store),
            config: Arc::new(self.config),
        };

        let mut app = build_api_routes(state).layer(cors);
        for (name, value) in SECURITY_HEADERS {
            app = app.layer(SetResponseHeaderLayer::if_not_present(
                name,
                HeaderValue::from_static(value),
            ));
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve on the configured host and port
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.socket_addr()?;
        self.serve(&addr.to_string()).await
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:5000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
