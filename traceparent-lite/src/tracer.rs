//! Process-wide tracer state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::client::{Client, Exporter};
use crate::error::{Error, Result};
use crate::span::Span;

/// Owner of the process-wide tracing state.
///
/// Acquire one when the process starts and release it with
/// [`TracerProvider::shutdown`] when the process is about to exit. A provider
/// dropped without an explicit shutdown is shut down on drop, and a failure
/// there is only logged.
///
/// ```
/// use traceparent_lite::{Context as _, CustomNamespace, MemoryClient, TraceContext, TracerProvider};
///
/// let client = MemoryClient::new();
/// let provider = TracerProvider::new(client.clone());
/// let context = TraceContext::new(provider.tracer(), None);
/// drop(context.enter_span(CustomNamespace::new("startup")));
/// provider.shutdown().unwrap();
/// assert_eq!(client.documents().len(), 1);
/// ```
#[derive(Debug)]
pub struct TracerProvider<C: Client = Exporter> {
    tracer: Tracer<C>,
}

impl TracerProvider<Exporter> {
    /// Creates a provider exporting with the [`Exporter`] configured by the
    /// Lambda environment variables.
    pub fn from_lambda_env() -> Result<Self> {
        Ok(Self::new(Exporter::from_lambda_env()?))
    }
}

impl<C: Client> TracerProvider<C> {
    /// Creates a provider exporting with a given client.
    pub fn new(client: C) -> Self {
        Self {
            tracer: Tracer {
                inner: Arc::new(Inner {
                    client,
                    pending: Mutex::new(Vec::new()),
                    shut_down: AtomicBool::new(false),
                }),
            },
        }
    }

    /// Returns a handle that starts spans against this provider.
    pub fn tracer(&self) -> Tracer<C> {
        self.tracer.clone()
    }

    /// Exports every finished span buffered so far.
    pub fn force_flush(&self) -> Result<()> {
        self.tracer.force_flush()
    }

    /// Flushes and closes the provider.
    ///
    /// Spans entered through any [`Tracer`] afterwards are not recorded.
    pub fn shutdown(self) -> Result<()> {
        self.tracer.shutdown()
    }
}

impl<C: Client> Drop for TracerProvider<C> {
    fn drop(&mut self) {
        if !self.tracer.is_shut_down() {
            let _ = self
                .tracer
                .shutdown()
                .map_err(|e| tracing::warn!(error = %e, "failed to shut down tracer provider"));
        }
    }
}

#[derive(Debug)]
struct Inner<C> {
    client: C,
    pending: Mutex<Vec<Span>>,
    shut_down: AtomicBool,
}

/// Cloneable handle to a [`TracerProvider`].
///
/// Finished spans are buffered until the next flush.
#[derive(Clone, Debug)]
pub struct Tracer<C: Client> {
    inner: Arc<Inner<C>>,
}

impl<C: Client> Tracer<C> {
    /// Whether the provider has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    /// Exports every finished span buffered so far.
    ///
    /// Every buffered span is attempted even if some fail; the first failure
    /// is returned.
    pub fn force_flush(&self) -> Result<()> {
        let spans = std::mem::take(
            &mut *self
                .inner
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        spans
            .iter()
            .map(|span| self.inner.client.send(span))
            .fold(Ok(()), |result, sent| result.and(sent))
    }

    pub(crate) fn record(&self, span: Span) {
        if self.is_shut_down() {
            tracing::warn!(name = %span.name, "span ended after tracer shutdown");
            return;
        }
        if !span.sampled {
            return;
        }
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(span);
    }

    fn shutdown(&self) -> Result<()> {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            return Err(Error::ShutDown);
        }
        self.force_flush()
    }
}
