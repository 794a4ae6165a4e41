//! Tower middleware applying the override policy to inbound requests.
//!
//! Runs once per request, before any handler:
//! 1. moves the raw headers into a [`ResolvedHeaders`] view
//! 2. replaces the request's header map with the view's resolved map
//! 3. stores the view in request extensions for [`Resolved`](super::Resolved)
//!
//! Later stages therefore only ever see resolved headers, whether they read
//! `req.headers()` or the extracted view.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{HeaderMap, Request};
use tower::{Layer, Service};

use super::policy::OverridePolicy;
use super::view::{Resolution, ResolvedHeaders};
use crate::observability::metrics;

/// The per-request view stored in request extensions.
pub type RequestHeaders = ResolvedHeaders<HeaderMap>;

#[derive(Clone, Debug)]
pub struct HeaderOverrideLayer {
    policy: Arc<OverridePolicy>,
}

impl HeaderOverrideLayer {
    pub fn new(policy: Arc<OverridePolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for HeaderOverrideLayer {
    type Service = HeaderOverride<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HeaderOverride {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Service produced by [`HeaderOverrideLayer`].
#[derive(Clone, Debug)]
pub struct HeaderOverride<S> {
    inner: S,
    policy: Arc<OverridePolicy>,
}

impl<S, B> Service<Request<B>> for HeaderOverride<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        resolve_request(&self.policy, &mut req);
        self.inner.call(req)
    }
}

/// Apply `policy` to `req` in place and return the view stored in its extensions.
pub fn resolve_request<B>(
    policy: &Arc<OverridePolicy>,
    req: &mut Request<B>,
) -> Arc<RequestHeaders> {
    let raw = std::mem::take(req.headers_mut());
    let view = ResolvedHeaders::new(policy.clone(), raw);

    let overridden = overridden_names(policy, &view);
    let fixed = rewritten_fixed(policy, view.raw());

    if !overridden.is_empty() {
        tracing::debug!(
            headers = ?overridden,
            path = %req.uri().path(),
            "Applied shadow header overrides"
        );
    }
    metrics::record_resolution(overridden.len(), fixed);

    *req.headers_mut() = view.all_headers().clone();

    let view = Arc::new(view);
    req.extensions_mut().insert(view.clone());
    view
}

/// Overridable headers whose resolved value came from a shadow header.
fn overridden_names<'a>(policy: &'a OverridePolicy, view: &RequestHeaders) -> Vec<&'a str> {
    policy
        .overridable_names()
        .filter(|name| view.resolution(name) == Resolution::Override)
        .collect()
}

/// Fixed headers that replaced or added a value the client did not send.
fn rewritten_fixed(policy: &OverridePolicy, raw: &HeaderMap) -> usize {
    policy
        .fixed_headers()
        .filter(|(name, value)| {
            let mut sent = raw.get_all(*name).iter();
            !(sent.next() == Some(*value) && sent.next().is_none())
        })
        .count()
}
