#![warn(missing_docs)]
//#![deny(warnings)]
//! Provides a lightweight client for [W3C Trace Context](https://www.w3.org/TR/trace-context/)
//! propagation on AWS Lambda
//!
//! ### Examples
//!
//! #### Continuing the caller's trace
//!
//! Here is an example to record a span of a remote service call as part of
//! the trace identified by an inbound `traceparent` header:
//!
//! ```
//! use traceparent_lite::{
//!     extract, Context, HeaderCarrier, MemoryClient, RemoteNamespace, TraceContext,
//!     TracerProvider,
//! };
//!
//! fn main() {
//!     let provider = TracerProvider::new(MemoryClient::new());
//!
//!     // headers of the inbound request
//!     let carrier: HeaderCarrier = [(
//!         "Traceparent",
//!         "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
//!     )]
//!     .into_iter()
//!     .collect();
//!     let context = TraceContext::new(provider.tracer(), extract(&carrier));
//!
//!     do_some_request(&context);
//!
//!     provider.shutdown().unwrap();
//! }
//!
//! fn do_some_request(context: &impl Context) {
//!     // span will have the name "readme example",
//!     // HTTP method "GET", and URL "https://checkip.amazonaws.com"
//!     let mut session = context.enter_span(RemoteNamespace::new(
//!         "readme example",
//!         "GET",
//!         "https://checkip.amazonaws.com",
//!     ));
//!
//!     // do some request ...
//!
//!     if let Some(namespace) = session.namespace_mut() {
//!         namespace.response_status(200);
//!     }
//!
//!     // the span will be ended and recorded when it is dropped
//! }
//! ```
//!
//! #### Custom span
//!
//! Here is an example to record a custom span in a new trace:
//!
//! ```
//! use traceparent_lite::{Context, CustomNamespace, MemoryClient, TraceContext, TracerProvider};
//!
//! fn main() {
//!     let client = MemoryClient::new();
//!     let provider = TracerProvider::new(client.clone());
//!     let context = TraceContext::new(provider.tracer(), None)
//!         .with_name_prefix("readme_example.");
//!
//!     do_something(&context);
//!
//!     provider.shutdown().unwrap();
//!     assert_eq!(client.documents()[0]["name"], "readme_example.do_something");
//! }
//!
//! fn do_something(context: &impl Context) {
//!     // span will have the name "readme_example.do_something"
//!     let _session = context.enter_span(CustomNamespace::new("do_something"));
//!
//!     // do some thing ...
//! }
//! ```

mod client;
mod context;
mod epoch;
mod error;
mod header;
mod hexbytes;
mod lambda;
mod namespace;
mod propagation;
mod session;
mod span;
mod span_id;
mod trace_id;
mod tracer;

pub use crate::{
    client::{Client, DaemonClient, Exporter, MemoryClient, StdoutClient},
    context::{Context, TraceContext},
    epoch::Seconds,
    error::{Error, Result},
    header::{TraceFlags, TraceParent},
    namespace::{CustomNamespace, InvocationNamespace, Namespace, RemoteNamespace},
    propagation::{extract, inject, Carrier, HeaderCarrier, Injector},
    session::SpanSession,
    span::*,
    span_id::SpanId,
    trace_id::TraceId,
    tracer::{Tracer, TracerProvider},
};
