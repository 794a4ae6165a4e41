//! Header override subsystem.
//!
//! # Data Flow
//! ```text
//! [header_override] config
//!     → policy.rs (allow-list, suffix, fixed values → base ⇄ shadow maps)
//!     → Arc<OverridePolicy>, shared by every request
//!
//! Incoming request:
//!     → layer.rs (take raw headers, build view, rewrite request headers)
//!     → view.rs (fixed > shadow > original, cached resolved map)
//!     → extract.rs (hand the view to handlers)
//! ```
//!
//! # Design Decisions
//! - Upstream proxies send replacement values in `<name><suffix>` headers
//! - Only allow-listed headers can be overridden this way
//! - Fixed values ignore the wire entirely
//! - Lookups never fail; a missing header is simply absent

pub mod extract;
pub mod layer;
pub mod policy;
pub mod source;
pub mod view;

pub use extract::Resolved;
pub use layer::{resolve_request, HeaderOverride, HeaderOverrideLayer, RequestHeaders};
pub use policy::{OverridePolicy, PolicyError};
pub use source::HeaderSource;
pub use view::{Resolution, ResolvedHeaders};
