//! Text-map carriers and W3C trace context propagation.

use std::collections::HashMap;

use crate::header::TraceParent;

/// Read access to trace context fields, whatever their transport.
pub trait Carrier {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<&str>;

    /// Returns every key in the carrier.
    fn keys(&self) -> Vec<&str>;
}

/// Write access to trace context fields.
pub trait Injector {
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);
}

/// Carrier over HTTP-style headers.
///
/// Keys are case-normalized to lowercase on the way in and on lookup, so
/// `Traceparent` and `traceparent` address the same entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderCarrier {
    headers: HashMap<String, String>,
}

impl HeaderCarrier {
    /// Creates an empty carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether the carrier has no entries.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl Carrier for HeaderCarrier {
    fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.headers.keys().map(String::as_str).collect()
    }
}

impl Injector for HeaderCarrier {
    fn set(&mut self, key: &str, value: String) {
        self.headers.insert(key.to_ascii_lowercase(), value);
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderCarrier
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut carrier = HeaderCarrier::new();
        for (key, value) in iter {
            carrier.set(key.as_ref(), value.into());
        }
        carrier
    }
}

impl IntoIterator for HeaderCarrier {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}

/// Extracts the remote parent context from a carrier.
///
/// Absent, empty, and malformed `traceparent` values all yield `None`; the
/// caller is expected to start a new trace in that case.
pub fn extract(carrier: &impl Carrier) -> Option<TraceParent> {
    let value = carrier.get(TraceParent::NAME)?.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<TraceParent>() {
        Ok(parent) => Some(parent),
        Err(e) => {
            tracing::debug!(value, error = %e, "ignoring malformed traceparent");
            None
        }
    }
}

/// Writes `parent` into a carrier as a `traceparent` entry.
pub fn inject(parent: &TraceParent, carrier: &mut impl Injector) {
    carrier.set(TraceParent::NAME, parent.to_string());
}
