use crate::{Seconds, SpanId, TraceId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Role of a span within a trace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// Handles an inbound request.
    Server,
    /// Makes an outbound request.
    Client,
    /// Local unit of work.
    #[default]
    Internal,
}

/// Description of a traced unit of work.
#[derive(Debug, Serialize, Clone)]
pub struct Span {
    /// Logical name of the operation.
    pub name: String,
    /// ID of this span.
    pub id: SpanId,
    /// ID of the trace this span belongs to.
    pub trace_id: TraceId,
    /// ID of the parent span, remote or local.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SpanId>,
    /// Role of the span.
    pub kind: SpanKind,
    /// Start time.
    pub start_time: Seconds,
    /// End time; absent while the span is in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Seconds>,
    /// Whether the trace is sampled.
    pub sampled: bool,
    /// Free-form attributes, following OpenTelemetry semantic convention
    /// names where one exists.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    /// HTTP request and response details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<Http>,
    /// Whether the operation failed.
    #[serde(skip_serializing_if = "is_false")]
    pub error: bool,
    /// Description of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !b
}

impl Span {
    /// Begins a new span now.
    pub fn begin(
        trace_id: TraceId,
        parent_id: Option<SpanId>,
        name: impl Into<String>,
        sampled: bool,
    ) -> Self {
        Span {
            name: name.into(),
            id: SpanId::new(),
            trace_id,
            parent_id,
            kind: SpanKind::default(),
            start_time: Seconds::now(),
            end_time: None,
            sampled,
            attributes: BTreeMap::new(),
            http: None,
            error: false,
            cause: None,
        }
    }

    /// Ends the span now. Ending twice keeps the first end time.
    pub fn end(&mut self) {
        if self.end_time.is_none() {
            self.end_time = Some(Seconds::now());
        }
    }

    /// Whether the span has not ended yet.
    pub fn in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Flags the span as failed.
    pub fn record_error(&mut self, cause: impl Into<String>) -> &mut Self {
        self.error = true;
        self.cause = Some(cause.into());
        self
    }
}

/// HTTP details of a span.
#[derive(Debug, Default, Serialize, Clone)]
pub struct Http {
    /// Request details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    /// Response details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

/// HTTP request details.
#[derive(Debug, Default, Serialize, Clone)]
pub struct Request {
    /// Request method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Full request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// HTTP response details.
#[derive(Debug, Default, Serialize, Clone)]
pub struct Response {
    /// Response status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}
