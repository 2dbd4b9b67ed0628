//! Trace carrier for API Gateway proxy events.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use traceparent_lite::{HeaderCarrier, Injector, TraceParent};

/// The part of an API Gateway proxy event the carrier is built from.
///
/// Header values stay untyped so one odd header does not hide the others.
#[derive(Debug, Default, Deserialize)]
struct ProxyHeaders {
    #[serde(default)]
    headers: Option<HashMap<String, Value>>,
}

/// Builds the trace carrier of an API Gateway proxy event from its raw JSON.
///
/// The carrier always holds exactly one entry, `traceparent`, whose value is
/// empty if the event has no such header, the header is not a string, or the
/// event cannot be parsed at all. The value is not validated here.
pub fn event_to_carrier(raw: &[u8]) -> HeaderCarrier {
    let event: ProxyHeaders = serde_json::from_slice(raw).unwrap_or_default();
    let headers = event.headers.unwrap_or_default();
    let value = headers
        .get(TraceParent::NAME)
        .or_else(|| {
            headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(TraceParent::NAME))
                .map(|(_, value)| value)
        })
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut carrier = HeaderCarrier::new();
    carrier.set(TraceParent::NAME, value);
    carrier
}
