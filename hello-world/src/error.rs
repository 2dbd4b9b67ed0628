use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an invocation.
///
/// Every variant is terminal: the invocation is not retried and no partial
/// response is produced.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The request did not complete: connection, DNS, TLS, or reading the
    /// body failed.
    #[error(transparent)]
    TransportError(#[from] reqwest::Error),
    /// The IP-echo service answered with something other than 200.
    #[error("Non 200 Response found: {0}")]
    NonSuccessStatus(StatusCode),
    /// The IP-echo service answered 200 with an empty body.
    #[error("No IP in HTTP response")]
    EmptyPayload,
}
