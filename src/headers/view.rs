//! Resolved header view over a raw request.
//!
//! # Resolution order
//! ```text
//! header_value(name)
//!     → fixed value for name?                      → fixed value
//!     → name overridable and shadow header sent?   → shadow header value(s)
//!     → otherwise                                  → original header value(s)
//! ```
//!
//! # Design Decisions
//! - Wraps the raw headers by composition; the raw source is never mutated
//! - Single-value and multi-value lookups share one resolution routine
//! - The full resolved map is built at most once per view (`OnceLock`)
//! - Shadow headers are never exposed under their own name by
//!   `header_names` or `all_headers`, but can still be queried directly

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use super::policy::{normalize, OverridePolicy};
use super::source::HeaderSource;

/// Where a resolved header value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Constant value from the policy.
    Fixed,
    /// Value of the shadow header sent by the upstream proxy.
    Override,
    /// The header as sent on the wire.
    Original,
}

enum Origin<'a> {
    Fixed(&'a HeaderValue),
    Shadow(&'a HeaderName),
    Original,
}

/// Headers of one request with the override policy applied.
#[derive(Debug)]
pub struct ResolvedHeaders<S> {
    policy: Arc<OverridePolicy>,
    raw: S,
    snapshot: OnceLock<HeaderMap>,
}

impl<S: HeaderSource> ResolvedHeaders<S> {
    pub fn new(policy: Arc<OverridePolicy>, raw: S) -> Self {
        Self {
            policy,
            raw,
            snapshot: OnceLock::new(),
        }
    }

    pub fn policy(&self) -> &OverridePolicy {
        &self.policy
    }

    /// The unresolved headers this view wraps.
    pub fn raw(&self) -> &S {
        &self.raw
    }

    /// Returns true if `name` is overridable and its shadow header was sent.
    pub fn should_override(&self, name: &str) -> bool {
        self.policy
            .shadow_name(name)
            .is_some_and(|shadow| self.raw.header_value(shadow.as_str()).is_some())
    }

    /// Which source `header_value(name)` reads from.
    pub fn resolution(&self, name: &str) -> Resolution {
        match self.origin(name) {
            Origin::Fixed(_) => Resolution::Fixed,
            Origin::Shadow(_) => Resolution::Override,
            Origin::Original => Resolution::Original,
        }
    }

    fn origin(&self, name: &str) -> Origin<'_> {
        if let Some(value) = self.policy.fixed_value(name) {
            return Origin::Fixed(value);
        }
        match self.policy.shadow_name(name) {
            Some(shadow) if self.should_override(name) => Origin::Shadow(shadow),
            _ => Origin::Original,
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        match self.origin(name) {
            Origin::Fixed(value) => Some(value),
            Origin::Shadow(shadow) => self.raw.header_value(shadow.as_str()),
            Origin::Original => self.raw.header_value(name),
        }
    }

    pub fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        match self.origin(name) {
            Origin::Fixed(value) => vec![value],
            Origin::Shadow(shadow) => self.raw.header_values(shadow.as_str()),
            Origin::Original => self.raw.header_values(name),
        }
    }

    /// Visible header names: shadow names are reported as their base name and
    /// fixed headers are listed even when the client never sent them.
    pub fn header_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for name in self.raw.header_names() {
            let name = normalize(&name).into_owned();
            let visible = match self.policy.base_name(&name) {
                Some(base) => base.as_str().to_owned(),
                None => name,
            };
            if seen.insert(visible.clone()) {
                names.push(visible);
            }
        }

        for (name, _) in self.policy.fixed_headers() {
            if seen.insert(name.as_str().to_owned()) {
                names.push(name.as_str().to_owned());
            }
        }

        names
    }

    /// Every visible header with its resolved values.
    ///
    /// Built on first call and cached for the life of the view; each entry
    /// equals what `header_values` returns for that name.
    pub fn all_headers(&self) -> &HeaderMap {
        self.snapshot.get_or_init(|| {
            let mut map = HeaderMap::new();
            for name in self.header_names() {
                let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                    continue;
                };
                for value in self.header_values(&name) {
                    map.append(header_name.clone(), value.clone());
                }
            }
            map
        })
    }
}

impl<S: HeaderSource> HeaderSource for ResolvedHeaders<S> {
    fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        ResolvedHeaders::header_value(self, name)
    }

    fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        ResolvedHeaders::header_values(self, name)
    }

    fn header_names(&self) -> Vec<String> {
        ResolvedHeaders::header_names(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn policy() -> Arc<OverridePolicy> {
        Arc::new(
            OverridePolicy::new(["foo"], "-OVERRIDDEN", [("bar", "bar-FIXED-VALUE")]).unwrap(),
        )
    }

    fn request(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/hello");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn test_override_and_fixed_scenario() {
        let req = request(&[
            ("foo", "original-foo"),
            ("foo-overridden", "new-foo"),
            ("bar", "client-bar"),
        ]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(view.header_value("foo").unwrap(), "new-foo");
        assert_eq!(view.header_value("FOO").unwrap(), "new-foo");
        assert_eq!(view.header_value("bar").unwrap(), "bar-FIXED-VALUE");
        assert_eq!(view.resolution("foo"), Resolution::Override);
        assert_eq!(view.resolution("bar"), Resolution::Fixed);

        let names = view.header_names();
        assert!(names.contains(&"foo".to_string()));
        assert!(names.contains(&"bar".to_string()));
        assert!(!names.contains(&"foo-overridden".to_string()));
        assert_eq!(sorted(names), vec!["bar", "foo"]);
    }

    #[test]
    fn test_shadow_header_still_readable_directly() {
        let req = request(&[("foo", "original-foo"), ("Foo-Overridden", "new-foo")]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(view.header_value("foo-overridden").unwrap(), "new-foo");
        assert_eq!(view.resolution("foo-overridden"), Resolution::Original);
    }

    #[test]
    fn test_original_value_without_shadow() {
        let req = request(&[("foo", "original-foo")]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert!(!view.should_override("foo"));
        assert_eq!(view.header_value("foo").unwrap(), "original-foo");
        assert_eq!(view.resolution("foo"), Resolution::Original);
    }

    #[test]
    fn test_fixed_header_without_wire_value() {
        let req = request(&[("foo", "original-foo")]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(view.header_value("bar").unwrap(), "bar-FIXED-VALUE");
        assert_eq!(view.header_values("bar"), vec!["bar-FIXED-VALUE"]);
        assert!(view.header_names().contains(&"bar".to_string()));
    }

    #[test]
    fn test_fixed_value_beats_shadow_header() {
        let policy = Arc::new(
            OverridePolicy::new(["host"], "-lb", [("host", "pinned.example.com")]).unwrap(),
        );
        let req = request(&[("host", "a.example.com"), ("host-lb", "b.example.com")]);
        let view = ResolvedHeaders::new(policy, &req);

        assert_eq!(view.header_value("host").unwrap(), "pinned.example.com");
        assert_eq!(view.all_headers().get_all("host").iter().count(), 1);
        assert_eq!(view.all_headers().get("host").unwrap(), "pinned.example.com");
    }

    #[test]
    fn test_unlisted_headers_pass_through() {
        let req = request(&[
            ("accept", "text/html"),
            ("accept", "application/json"),
            ("accept-overridden", "ignored"),
        ]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(
            view.header_values("accept"),
            vec!["text/html", "application/json"]
        );
        assert!(view.header_value("x-missing").is_none());
        assert!(view.header_values("x-missing").is_empty());
        assert!(view.header_names().contains(&"accept-overridden".to_string()));
    }

    #[test]
    fn test_multi_valued_shadow_replaces_all_values() {
        let req = request(&[
            ("foo", "a"),
            ("foo", "b"),
            ("foo-overridden", "x"),
            ("foo-overridden", "y"),
            ("foo-overridden", "z"),
        ]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(view.header_values("foo"), vec!["x", "y", "z"]);
        assert_eq!(view.header_value("foo").unwrap(), "x");
    }

    #[test]
    fn test_shadow_only_request_exposes_base_name() {
        let req = request(&[("foo-overridden", "new-foo")]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(sorted(view.header_names()), vec!["bar", "foo"]);
        assert_eq!(view.all_headers().get("foo").unwrap(), "new-foo");
        assert!(view.all_headers().get("foo-overridden").is_none());
    }

    #[test]
    fn test_all_headers_matches_header_values() {
        let req = request(&[
            ("foo", "original-foo"),
            ("foo-overridden", "new-foo"),
            ("bar", "client-bar"),
            ("accept", "text/html"),
            ("accept", "application/json"),
        ]);
        let view = ResolvedHeaders::new(policy(), &req);

        let first = view.all_headers().clone();
        let second = view.all_headers();
        assert_eq!(&first, second);

        assert_eq!(first.keys_len(), view.header_names().len());
        for name in view.header_names() {
            let from_map: Vec<_> = first.get_all(name.as_str()).iter().collect();
            assert_eq!(from_map, view.header_values(&name), "header {name}");
        }
    }

    #[test]
    fn test_view_is_a_header_source() {
        fn first_value<H: HeaderSource>(source: &H, name: &str) -> Option<String> {
            source
                .header_value(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        }

        let req = request(&[("foo", "original-foo"), ("foo-overridden", "new-foo")]);
        let view = ResolvedHeaders::new(policy(), &req);

        assert_eq!(first_value(&req, "foo").as_deref(), Some("original-foo"));
        assert_eq!(first_value(&view, "foo").as_deref(), Some("new-foo"));
    }
}
