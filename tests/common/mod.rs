//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use header_override::{HttpServer, ServerConfig, Shutdown};
use tokio::net::TcpListener;

/// Config with `foo` overridable via `foo-OVERRIDDEN` and `bar` pinned.
pub fn sample_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observability.metrics_enabled = false;
    config.header_override.overridable = vec!["foo".into()];
    config.header_override.suffix = "-OVERRIDDEN".into();
    config
        .header_override
        .fixed
        .insert("bar".into(), "bar-FIXED-VALUE".into());
    config
}

/// Start a server on an ephemeral port.
///
/// The returned `Shutdown` must be kept alive for the server to keep running.
#[allow(dead_code)]
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}
