//! Override policy.
//!
//! # Responsibilities
//! - Hold the allow-list of overridable header names and the override suffix
//! - Precompute the base name ⇄ shadow name mapping
//! - Hold the fixed-value table
//!
//! # Design Decisions
//! - Every key is lowercased through [`normalize`]; no other code lowercases names
//! - Immutable after construction, shared via `Arc` across requests
//! - Ambiguous configurations are rejected here instead of at request time

use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::HeaderOverrideConfig;

/// Errors raised while building an [`OverridePolicy`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A configured name is not a valid HTTP header name.
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),

    /// A fixed value cannot be sent as an HTTP header value.
    #[error("invalid fixed value for header {0:?}")]
    InvalidFixedValue(String),

    /// The shadow header of one overridable header is itself overridable.
    #[error("shadow header {shadow:?} of {base:?} is also an overridable header")]
    ShadowIsBase { base: String, shadow: String },
}

/// Lowercase a header name, borrowing when it is already lowercase.
pub(crate) fn normalize(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

fn parse_name(name: &str) -> Result<HeaderName, PolicyError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| PolicyError::InvalidHeaderName(name.to_string()))
}

/// Which headers may be overridden, how their shadow headers are named, and
/// which headers carry a constant value.
#[derive(Debug, Clone, Default)]
pub struct OverridePolicy {
    suffix: String,
    /// base name -> shadow header name
    to_shadow: BTreeMap<String, HeaderName>,
    /// shadow name -> base header name
    to_base: BTreeMap<String, HeaderName>,
    fixed: BTreeMap<String, (HeaderName, HeaderValue)>,
}

impl OverridePolicy {
    /// Build a policy from an allow-list, a suffix and a fixed-value table.
    pub fn new<I, N, F, K, V>(overridable: I, suffix: &str, fixed: F) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
        F: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut to_shadow = BTreeMap::new();
        let mut to_base = BTreeMap::new();
        let mut order = Vec::new();

        for base in overridable {
            let base = normalize(base.as_ref()).into_owned();
            if to_shadow.contains_key(&base) {
                continue;
            }
            let base_name = parse_name(&base)?;
            let shadow = normalize(&format!("{base}{suffix}")).into_owned();
            let shadow_name = parse_name(&shadow)?;

            to_base.insert(shadow.clone(), base_name);
            to_shadow.insert(base.clone(), shadow_name);
            order.push((base, shadow));
        }

        // A shadow that is also a base would make resolution order-dependent.
        for (base, shadow) in &order {
            if to_shadow.contains_key(shadow) {
                return Err(PolicyError::ShadowIsBase {
                    base: base.clone(),
                    shadow: shadow.clone(),
                });
            }
        }

        let mut fixed_headers = BTreeMap::new();
        for (name, value) in fixed {
            let key = normalize(name.as_ref()).into_owned();
            let header_name = parse_name(&key)?;
            let header_value = HeaderValue::from_str(value.as_ref())
                .map_err(|_| PolicyError::InvalidFixedValue(key.clone()))?;
            fixed_headers.insert(key, (header_name, header_value));
        }

        Ok(Self {
            suffix: suffix.to_string(),
            to_shadow,
            to_base,
            fixed: fixed_headers,
        })
    }

    /// Build the policy described by the `[header_override]` config section.
    pub fn from_config(config: &HeaderOverrideConfig) -> Result<Self, PolicyError> {
        Self::new(&config.overridable, &config.suffix, &config.fixed)
    }

    /// The configured override suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Shadow header carrying the override for `base`, if `base` is overridable.
    pub fn shadow_name(&self, base: &str) -> Option<&HeaderName> {
        self.to_shadow.get(&*normalize(base))
    }

    /// Base header that `shadow` overrides, if `shadow` is a shadow header.
    pub fn base_name(&self, shadow: &str) -> Option<&HeaderName> {
        self.to_base.get(&*normalize(shadow))
    }

    pub fn is_fixed(&self, name: &str) -> bool {
        self.fixed.contains_key(&*normalize(name))
    }

    pub fn fixed_value(&self, name: &str) -> Option<&HeaderValue> {
        self.fixed.get(&*normalize(name)).map(|(_, value)| value)
    }

    /// All fixed headers, ordered by name.
    pub fn fixed_headers(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.fixed.values().map(|(name, value)| (name, value))
    }

    /// All overridable base names, ordered.
    pub fn overridable_names(&self) -> impl Iterator<Item = &str> {
        self.to_shadow.keys().map(String::as_str)
    }

    /// Returns true if the policy would never change a request.
    pub fn is_empty(&self) -> bool {
        self.to_shadow.is_empty() && self.fixed.is_empty()
    }
}
