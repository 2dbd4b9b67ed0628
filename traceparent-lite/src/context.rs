//! Tracing context.

use crate::client::Client;
use crate::header::{TraceFlags, TraceParent};
use crate::namespace::Namespace;
use crate::session::SpanSession;
use crate::tracer::Tracer;
use crate::{SpanId, TraceId};

/// Context.
pub trait Context {
    /// Client the spans are exported with.
    type Client: Client;

    /// Enters in a new span.
    ///
    /// [`SpanSession`] records the end of the span when it is dropped.
    fn enter_span<N>(&self, namespace: N) -> SpanSession<Self::Client, N>
    where
        N: Namespace + Send + Sync;
}

/// Context of spans within one trace.
///
/// Spans entered through a context are children of the context's parent,
/// which may live in another process, or roots of a new trace if there is no
/// parent.
#[derive(Clone, Debug)]
pub struct TraceContext<C: Client> {
    tracer: Tracer<C>,
    trace_id: TraceId,
    parent_id: Option<SpanId>,
    flags: TraceFlags,
    name_prefix: String,
}

impl<C: Client> TraceContext<C> {
    /// Creates a context continuing the trace of `parent`, or starting a new
    /// sampled trace if `parent` is `None`.
    pub fn new(tracer: Tracer<C>, parent: Option<TraceParent>) -> Self {
        let (trace_id, parent_id, flags) = match parent {
            Some(parent) => (parent.trace_id, Some(parent.parent_id), parent.flags),
            None => (TraceId::new(), None, TraceFlags::SAMPLED),
        };
        Self {
            tracer,
            trace_id,
            parent_id,
            flags,
            name_prefix: "".to_string(),
        }
    }

    /// Updates the context with a given name prefix.
    ///
    /// The name prefix is prepended to the name of every custom span.
    /// Only spans associated with
    /// [`CustomNamespace`][crate::namespace::CustomNamespace] are affected.
    pub fn with_name_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: prefix.into(),
            ..self
        }
    }

    /// ID of the trace.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// The parent of spans entered through this context, if any.
    pub fn traceparent(&self) -> Option<TraceParent> {
        self.parent_id
            .as_ref()
            .map(|parent_id| TraceParent::new(self.trace_id.clone(), parent_id.clone(), self.flags))
    }
}

impl<C: Client> Context for TraceContext<C> {
    type Client = C;

    fn enter_span<N>(&self, namespace: N) -> SpanSession<C, N>
    where
        N: Namespace + Send + Sync,
    {
        SpanSession::new(
            self.tracer.clone(),
            &self.trace_id,
            self.parent_id.as_ref(),
            self.flags,
            namespace,
            &self.name_prefix,
        )
    }
}
