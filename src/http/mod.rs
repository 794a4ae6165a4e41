//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → headers::HeaderOverrideLayer (resolve shadow and fixed headers)
//!     → handlers.rs (read headers through the resolved view)
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::{build_router, HttpServer};
