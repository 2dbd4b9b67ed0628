//! Span session management.

use crate::client::Client;
use crate::context::TraceContext;
use crate::header::{TraceFlags, TraceParent};
use crate::namespace::Namespace;
use crate::span::Span;
use crate::tracer::Tracer;
use crate::{SpanId, TraceId};

/// Span session.
#[derive(Debug)]
pub enum SpanSession<C, N>
where
    C: Client,
    N: Namespace + Send + Sync,
{
    /// Entered span.
    Entered {
        /// Tracer the span is recorded with.
        tracer: Tracer<C>,
        /// Trace flags inherited from the parent.
        flags: TraceFlags,
        /// Prefix applied to custom spans entered below this one.
        name_prefix: String,
        /// Span.
        span: Span,
        /// Namespace.
        namespace: N,
    },
    /// Failed span.
    Failed,
}

impl<C, N> SpanSession<C, N>
where
    C: Client,
    N: Namespace + Send + Sync,
{
    pub(crate) fn new(
        tracer: Tracer<C>,
        trace_id: &TraceId,
        parent_id: Option<&SpanId>,
        flags: TraceFlags,
        namespace: N,
        name_prefix: &str,
    ) -> Self {
        if tracer.is_shut_down() {
            return Self::failed();
        }
        let mut span = Span::begin(
            trace_id.clone(),
            parent_id.cloned(),
            namespace.name(name_prefix),
            flags.is_sampled(),
        );
        namespace.update_span(&mut span);
        Self::Entered {
            tracer,
            flags,
            name_prefix: name_prefix.to_string(),
            span,
            namespace,
        }
    }

    pub(crate) fn failed() -> Self {
        Self::Failed
    }

    /// Returns the `traceparent` header value identifying this span as the
    /// parent of a downstream request.
    pub fn traceparent(&self) -> Option<String> {
        match self {
            Self::Entered { span, flags, .. } => Some(parent_of(span, *flags).to_string()),
            Self::Failed => None,
        }
    }

    /// Returns a context whose spans are children of this span.
    pub fn context(&self) -> Option<TraceContext<C>> {
        match self {
            Self::Entered {
                tracer,
                flags,
                name_prefix,
                span,
                ..
            } => {
                let context = TraceContext::new(tracer.clone(), Some(parent_of(span, *flags)));
                Some(context.with_name_prefix(name_prefix.clone()))
            }
            Self::Failed => None,
        }
    }

    /// Returns the namespace as a mutable reference.
    pub fn namespace_mut(&mut self) -> Option<&mut N> {
        match self {
            Self::Entered { namespace, .. } => Some(namespace),
            Self::Failed => None,
        }
    }

    /// Flags the span as failed.
    pub fn record_error(&mut self, cause: impl Into<String>) {
        if let Self::Entered { span, .. } = self {
            span.record_error(cause);
        }
    }
}

impl<C, N> Drop for SpanSession<C, N>
where
    C: Client,
    N: Namespace + Send + Sync,
{
    fn drop(&mut self) {
        match self {
            Self::Entered {
                tracer,
                span,
                namespace,
                ..
            } => {
                span.end();
                namespace.update_span(span);
                tracer.record(span.clone());
            }
            Self::Failed => (),
        }
    }
}

fn parent_of(span: &Span, flags: TraceFlags) -> TraceParent {
    TraceParent::new(span.trace_id.clone(), span.id.clone(), flags)
}
