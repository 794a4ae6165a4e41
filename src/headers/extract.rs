//! Axum extractor for the per-request resolved headers.

use std::ops::Deref;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;

use super::layer::RequestHeaders;

/// Resolved headers of the current request.
///
/// Requires [`HeaderOverrideLayer`](super::HeaderOverrideLayer) on the route;
/// without it extraction fails with `500 Internal Server Error`.
#[derive(Debug, Clone)]
pub struct Resolved(pub Arc<RequestHeaders>);

impl Deref for Resolved {
    type Target = RequestHeaders;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Resolved
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Arc<RequestHeaders>>() {
            Some(view) => Ok(Resolved(view.clone())),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "Resolved headers requested but HeaderOverrideLayer is not installed"
                );
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Header override layer not installed",
                ))
            }
        }
    }
}
