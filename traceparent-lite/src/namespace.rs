//! Namespace encapsulation for spans.

use crate::span::{Http, Request, Response, Span, SpanKind};

/// Namespace.
pub trait Namespace {
    /// Name of the namespace.
    ///
    /// `prefix` may be ignored.
    fn name(&self, prefix: &str) -> String;

    /// Updates the span.
    ///
    /// Called once when the span begins and once more when it ends.
    fn update_span(&self, span: &mut Span);
}

/// Namespace for a function invocation.
#[derive(Debug)]
pub struct InvocationNamespace {
    function_name: String,
    request_id: String,
    cold_start: bool,
    trigger: &'static str,
}

impl InvocationNamespace {
    /// Creates a namespace for an invocation of a given function.
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: request_id.into(),
            cold_start: false,
            trigger: "other",
        }
    }

    /// Marks the invocation as the first one of the process.
    pub fn cold_start(mut self, cold_start: bool) -> Self {
        self.cold_start = cold_start;
        self
    }

    /// Sets the trigger type: `http`, `pubsub`, `datasource`, `timer`, or
    /// `other` (the default).
    pub fn trigger(mut self, trigger: &'static str) -> Self {
        self.trigger = trigger;
        self
    }
}

impl Namespace for InvocationNamespace {
    fn name(&self, _prefix: &str) -> String {
        if self.function_name.is_empty() {
            "handler".to_string()
        } else {
            self.function_name.clone()
        }
    }

    fn update_span(&self, span: &mut Span) {
        span.kind = SpanKind::Server;
        span.set_attribute("faas.trigger", self.trigger)
            .set_attribute("faas.coldstart", self.cold_start);
        if !self.function_name.is_empty() {
            span.set_attribute("faas.name", self.function_name.clone());
        }
        if !self.request_id.is_empty() {
            span.set_attribute("faas.invocation_id", self.request_id.clone());
        }
    }
}

/// Namespace for an arbitrary remote service.
#[derive(Debug)]
pub struct RemoteNamespace {
    name: String,
    method: String,
    url: String,
    status: Option<u16>,
}

impl RemoteNamespace {
    /// Creates a namespace for a remote service.
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            status: None,
        }
    }

    /// Sets the response status.
    pub fn response_status(&mut self, status: u16) -> &mut Self {
        self.status = Some(status);
        self
    }
}

impl Namespace for RemoteNamespace {
    fn name(&self, _prefix: &str) -> String {
        self.name.clone()
    }

    fn update_span(&self, span: &mut Span) {
        span.kind = SpanKind::Client;
        let http = span.http.get_or_insert_with(Http::default);
        http.request = Some(Request {
            method: Some(self.method.clone()),
            url: Some(self.url.clone()),
        });
        if let Some(status) = self.status {
            http.response = Some(Response {
                status: Some(status),
            });
        }
    }
}

/// Namespace for a custom span.
#[derive(Debug)]
pub struct CustomNamespace {
    name: String,
}

impl CustomNamespace {
    /// Creates a namespace for a custom span.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Namespace for CustomNamespace {
    fn name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name)
    }

    fn update_span(&self, span: &mut Span) {
        span.kind = SpanKind::Internal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TraceId;

    fn span() -> Span {
        Span::begin(TraceId::new(), None, "test", true)
    }

    #[test]
    fn invocation_namespace_marks_server_span() {
        let request_id = "8476a536-e9f4-11e8-9739-2dfe598c3fcd";
        let namespace = InvocationNamespace::new("hello-world", request_id)
            .cold_start(true)
            .trigger("http");
        let mut span = span();
        namespace.update_span(&mut span);
        assert_eq!(namespace.name("ignored."), "hello-world");
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.attributes["faas.coldstart"], true);
        assert_eq!(span.attributes["faas.trigger"], "http");
        assert_eq!(
            span.attributes["faas.invocation_id"],
            "8476a536-e9f4-11e8-9739-2dfe598c3fcd"
        );
    }

    #[test]
    fn invocation_namespace_without_function_name() {
        let namespace = InvocationNamespace::new("", "");
        let mut span = span();
        namespace.update_span(&mut span);
        assert_eq!(namespace.name(""), "handler");
        assert_eq!(span.attributes["faas.trigger"], "other");
        assert_eq!(span.attributes["faas.coldstart"], false);
        assert!(!span.attributes.contains_key("faas.name"));
        assert!(!span.attributes.contains_key("faas.invocation_id"));
    }

    #[test]
    fn remote_namespace_records_request_and_status() {
        let mut namespace = RemoteNamespace::new("checkip", "GET", "https://checkip.amazonaws.com");
        let mut span = span();
        namespace.update_span(&mut span);
        assert!(span.http.as_ref().unwrap().response.is_none());

        namespace.response_status(200);
        namespace.update_span(&mut span);
        let http = span.http.unwrap();
        assert_eq!(http.request.unwrap().method.as_deref(), Some("GET"));
        assert_eq!(http.response.unwrap().status, Some(200));
        assert_eq!(span.kind, SpanKind::Client);
    }

    #[test]
    fn custom_namespace_uses_prefix() {
        assert_eq!(
            CustomNamespace::new("do_something").name("readme_example."),
            "readme_example.do_something"
        );
    }
}
