//! Inbound header override middleware.
//!
//! Lets a load balancer replace selected request headers by sending
//! `<name><suffix>` shadow headers, and pins other headers to fixed values,
//! before any application handler reads them.

pub mod config;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use headers::{HeaderOverrideLayer, OverridePolicy, Resolved, ResolvedHeaders};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
