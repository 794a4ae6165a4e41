//! Header query capability shared by raw requests and resolved views.

use axum::http::{HeaderMap, HeaderValue, Request};

/// Read-only, case-insensitive header lookups.
///
/// Implemented by raw header maps and requests as well as by
/// [`ResolvedHeaders`](super::ResolvedHeaders), so code written against this
/// trait cannot tell a resolved view from the request it wraps.
pub trait HeaderSource {
    /// First value of `name`, if present.
    fn header_value(&self, name: &str) -> Option<&HeaderValue>;

    /// Every value of `name`, in wire order. Empty if absent.
    fn header_values(&self, name: &str) -> Vec<&HeaderValue>;

    /// Lowercase names of all headers present, without duplicates.
    fn header_names(&self) -> Vec<String>;
}

impl HeaderSource for HeaderMap {
    fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        self.get(name)
    }

    fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        self.get_all(name).iter().collect()
    }

    fn header_names(&self) -> Vec<String> {
        self.keys().map(|name| name.as_str().to_owned()).collect()
    }
}

impl<B> HeaderSource for Request<B> {
    fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        self.headers().header_value(name)
    }

    fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        self.headers().header_values(name)
    }

    fn header_names(&self) -> Vec<String> {
        self.headers().header_names()
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        (**self).header_value(name)
    }

    fn header_values(&self, name: &str) -> Vec<&HeaderValue> {
        (**self).header_values(name)
    }

    fn header_names(&self) -> Vec<String> {
        (**self).header_names()
    }
}
