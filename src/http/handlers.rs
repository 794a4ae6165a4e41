//! Diagnostic handlers reading headers through the resolved view.

use std::collections::{BTreeMap, BTreeSet};

use axum::http::HeaderValue;
use axum::Json;

use crate::headers::Resolved;

fn display(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// `GET /hello`: every overridable or fixed header as `name=[v1, v2]`.
pub async fn hello(Resolved(headers): Resolved) -> String {
    let policy = headers.policy();
    let mut names: BTreeSet<&str> = policy.overridable_names().collect();
    names.extend(policy.fixed_headers().map(|(name, _)| name.as_str()));

    names
        .into_iter()
        .map(|name| {
            let values: Vec<String> = headers.header_values(name).into_iter().map(display).collect();
            format!("{name}=[{}]", values.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `GET /headers`: the full resolved header map.
pub async fn resolved_headers(Resolved(headers): Resolved) -> Json<BTreeMap<String, Vec<String>>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.all_headers() {
        map.entry(name.as_str().to_owned())
            .or_default()
            .push(display(value));
    }
    Json(map)
}
