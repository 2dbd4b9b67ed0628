//! Lambda function greeting the caller with the function's public IP address.
//!
//! The function is two plain pieces composed in `main`:
//! - [`CheckIp::handle`] performs the single outbound GET and builds the
//!   gateway response
//! - [`event_to_carrier`] exposes the inbound `traceparent` header so the
//!   invocation span joins the caller's trace

mod carrier;
mod error;
mod handler;

pub use crate::{
    carrier::event_to_carrier,
    error::HandlerError,
    handler::{CheckIp, DEFAULT_HTTP_GET_ADDRESS},
};
