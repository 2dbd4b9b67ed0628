#![warn(missing_docs)]

//! Extension of `traceparent-lite` for the [AWS Lambda Rust runtime](https://github.com/awslabs/aws-lambda-rust-runtime).
//!
//! [`instrument_handler`] composes a handler with a function that turns the
//! raw event into a [`Carrier`]. Every invocation of the composed handler is
//! recorded as a server span parented to whatever `traceparent` the carrier
//! yields, and the handler receives a [`TraceContext`] for its own spans.
//!
//! ```no_run
//! use lambda_runtime::{service_fn, Error};
//! use traceparent_lite::{HeaderCarrier, MemoryClient, TraceContext, TracerProvider};
//! use traceparent_lite_lambda::instrument_handler;
//!
//! async fn handler(
//!     event: serde_json::Value,
//!     _context: TraceContext<MemoryClient>,
//! ) -> Result<serde_json::Value, Error> {
//!     Ok(event)
//! }
//!
//! fn event_to_carrier(_raw: &[u8]) -> HeaderCarrier {
//!     HeaderCarrier::new()
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Error> {
//!     let provider = TracerProvider::new(MemoryClient::new());
//!     let instrumented = instrument_handler(provider.tracer(), handler, event_to_carrier);
//!     lambda_runtime::run(service_fn(move |event| {
//!         let instrumented = instrumented.clone();
//!         async move { instrumented.invoke(event).await }
//!     }))
//!     .await?;
//!     provider.shutdown()?;
//!     Ok(())
//! }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde::de::DeserializeOwned;
use serde_json::Value;

use traceparent_lite::{
    extract, Carrier, Client, Context, InvocationNamespace, TraceContext, Tracer,
};

/// Wraps `handler` so that every invocation is traced.
///
/// `event_to_carrier` receives the raw JSON payload of each invocation and
/// returns the carrier the parent trace context is extracted from.
pub fn instrument_handler<C, E, F, Fut, X, K>(
    tracer: Tracer<C>,
    handler: F,
    event_to_carrier: X,
) -> InstrumentedHandler<C, E, F, X>
where
    C: Client,
    F: Fn(E, TraceContext<C>) -> Fut,
    X: Fn(&[u8]) -> K,
    K: Carrier,
{
    InstrumentedHandler {
        tracer,
        handler: Arc::new(handler),
        event_to_carrier: Arc::new(event_to_carrier),
        cold_start: Arc::new(AtomicBool::new(true)),
        trigger: "other",
        _event: PhantomData,
    }
}

/// Handler returned by [`instrument_handler`].
///
/// Clones share the handler, the carrier function, and the cold start state.
#[derive(Debug)]
pub struct InstrumentedHandler<C: Client, E, F, X> {
    tracer: Tracer<C>,
    handler: Arc<F>,
    event_to_carrier: Arc<X>,
    cold_start: Arc<AtomicBool>,
    trigger: &'static str,
    _event: PhantomData<fn(E)>,
}

impl<C: Client, E, F, X> Clone for InstrumentedHandler<C, E, F, X> {
    fn clone(&self) -> Self {
        Self {
            tracer: self.tracer.clone(),
            handler: self.handler.clone(),
            event_to_carrier: self.event_to_carrier.clone(),
            cold_start: self.cold_start.clone(),
            trigger: self.trigger,
            _event: PhantomData,
        }
    }
}

impl<C, E, F, X> InstrumentedHandler<C, E, F, X>
where
    C: Client,
    E: DeserializeOwned,
{
    /// Sets the `faas.trigger` attribute of invocation spans, `other` unless
    /// set.
    pub fn with_trigger(mut self, trigger: &'static str) -> Self {
        self.trigger = trigger;
        self
    }

    /// Handles one invocation.
    ///
    /// The handler's result is returned unchanged; only its error is
    /// converted into the runtime's [`Error`].
    pub async fn invoke<Fut, R, HE, K>(&self, event: LambdaEvent<Value>) -> Result<R, Error>
    where
        F: Fn(E, TraceContext<C>) -> Fut,
        Fut: Future<Output = Result<R, HE>>,
        HE: Into<Error> + Display,
        X: Fn(&[u8]) -> K,
        K: Carrier,
    {
        let LambdaEvent { payload, context } = event;

        let raw = serde_json::to_vec(&payload).unwrap_or_default();
        let carrier = (self.event_to_carrier)(&raw);
        let parent = extract(&carrier);
        if parent.is_none() {
            tracing::debug!(
                request_id = %context.request_id,
                "no parent trace context, starting a new trace"
            );
        }
        let trace = TraceContext::new(self.tracer.clone(), parent);

        let cold_start = self.cold_start.swap(false, Ordering::AcqRel);
        let namespace = InvocationNamespace::new(
            context.env_config.function_name.clone(),
            context.request_id.clone(),
        )
        .cold_start(cold_start)
        .trigger(self.trigger);
        let mut session = trace.enter_span(namespace);

        let result = match serde_json::from_value::<E>(payload) {
            Ok(event) => {
                let child = session.context().unwrap_or_else(|| trace.clone());
                match (self.handler)(event, child).await {
                    Ok(response) => Ok(response),
                    Err(e) => {
                        session.record_error(e.to_string());
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                session.record_error(format!("invalid event payload: {e}"));
                Err(e.into())
            }
        };
        drop(session);

        let _ = self
            .tracer
            .force_flush()
            .map_err(|e| tracing::warn!(error = %e, "failed to flush spans"));
        result
    }
}
