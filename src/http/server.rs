//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, header override, timeout)
//! - Bind server to listener
//! - Graceful shutdown on the lifecycle shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::headers::{HeaderOverrideLayer, OverridePolicy, PolicyError};
use crate::http::handlers;

/// HTTP server fronting the application routes.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, PolicyError> {
        let policy = Arc::new(OverridePolicy::from_config(&config.header_override)?);

        tracing::info!(
            overridable = ?policy.overridable_names().collect::<Vec<_>>(),
            suffix = %policy.suffix(),
            fixed = policy.fixed_headers().count(),
            "Header override policy loaded"
        );
        if policy.is_empty() {
            tracing::warn!("Header override policy is empty; requests pass through unchanged");
        }

        let router = build_router(&config, policy);
        Ok(Self { router })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Layers listed last run first: a request has its headers resolved before
/// anything else reads them, then gets its ID, is traced and reaches the
/// timeout and the handler.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, policy: Arc<OverridePolicy>) -> Router {
    Router::new()
        .route("/hello", get(handlers::hello))
        .route("/headers", get(handlers::resolved_headers))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(HeaderOverrideLayer::new(policy))
}

/// Wait for the shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown requested");
}
