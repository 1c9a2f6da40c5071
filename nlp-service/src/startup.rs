//! Application startup and lifecycle management.
//!
//! The model is loaded before the listener is bound, so a process that fails
//! to find or compile its model never accepts connections.

use crate::config::NlpConfig;
use crate::handlers;
use crate::services::{ModelLoader, NluModel};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Read-only for the lifetime of the process.
    pub model: Arc<dyn NluModel>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/parse",
            post(handlers::parse_text).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Load the model selected by `config.model` and bind the listener.
    pub async fn build(config: NlpConfig) -> Result<Self, AppError> {
        let model = ModelLoader::from_config(&config.model)
            .load()
            .await
            .map_err(|e| {
                tracing::error!("Failed to load NLU model: {}", e);
                AppError::ConfigError(anyhow::Error::new(e))
            })?;

        Self::build_with_model(config, Arc::new(model)).await
    }

    /// Bind the listener around an already constructed model.
    pub async fn build_with_model(
        config: NlpConfig,
        model: Arc<dyn NluModel>,
    ) -> Result<Self, AppError> {
        let router = build_router(AppState { model });

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("nlp-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `signal` resolves, then drain open connections.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
