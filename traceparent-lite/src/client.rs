//! Span exporters.

use std::io::{self, Write};
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::lambda;

/// Exporter interface.
pub trait Client: Clone + std::fmt::Debug + Send + Sync {
    /// Sends a span document to wherever this client exports to.
    fn send<S>(&self, data: &S) -> Result<()>
    where
        S: Serialize;
}

/// Client sending span documents as UDP datagrams to a collector daemon.
#[derive(Clone, Debug)]
pub struct DaemonClient {
    socket: Arc<UdpSocket>,
}

impl DaemonClient {
    const HEADER: &'static [u8] = br#"{"format": "json", "version": 1}"#;
    const DELIMITER: &'static [u8] = &[b'\n'];

    /// Return a new client connected
    /// to the provided `addr`
    pub fn new(addr: SocketAddr) -> Result<Self> {
        let socket = Arc::new(UdpSocket::bind(&[([0, 0, 0, 0], 0).into()][..])?);
        socket.set_nonblocking(true)?;
        socket.connect(addr)?;
        Ok(DaemonClient { socket })
    }

    #[inline]
    fn packet<S>(data: S) -> Result<Vec<u8>>
    where
        S: Serialize,
    {
        let bytes = serde_json::to_vec(&data)?;
        Ok([Self::HEADER, Self::DELIMITER, &bytes].concat())
    }
}

impl Client for DaemonClient {
    fn send<S>(&self, data: &S) -> Result<()>
    where
        S: Serialize,
    {
        self.socket.send(&Self::packet(data)?)?;
        Ok(())
    }
}

/// Client writing one JSON document per line to stdout.
///
/// On Lambda, stdout ends up in the function's log stream, where a log
/// subscription can forward the documents to a collector.
#[derive(Clone, Debug, Default)]
pub struct StdoutClient;

impl Client for StdoutClient {
    fn send<S>(&self, data: &S) -> Result<()>
    where
        S: Serialize,
    {
        let mut line = serde_json::to_vec(data)?;
        line.push(b'\n');
        let mut out = io::stdout().lock();
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}

/// Client keeping span documents in memory.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryClient {
    documents: Arc<Mutex<Vec<Value>>>,
}

impl MemoryClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the documents sent so far, oldest first.
    pub fn documents(&self) -> Vec<Value> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Client for MemoryClient {
    fn send<S>(&self, data: &S) -> Result<()>
    where
        S: Serialize,
    {
        let document = serde_json::to_value(data)?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(document);
        Ok(())
    }
}

/// Exporter selected by configuration.
#[derive(Clone, Debug)]
pub enum Exporter {
    /// Writes to stdout.
    Stdout(StdoutClient),
    /// Sends to a collector daemon.
    Daemon(DaemonClient),
    /// Drops everything.
    Noop,
}

impl Exporter {
    /// Creates an exporter from the Lambda environment variables.
    ///
    /// - `TRACEPARENT_LITE_EXPORTER`: `stdout` (default), `daemon`, or `none`
    /// - `TRACEPARENT_LITE_DAEMON_ADDRESS`: collector daemon address, required
    ///   by `daemon`
    pub fn from_lambda_env() -> Result<Self> {
        match lambda::exporter_kind()?.as_deref() {
            None | Some("stdout") => Ok(Exporter::Stdout(StdoutClient)),
            Some("daemon") => Ok(Exporter::Daemon(DaemonClient::new(
                lambda::daemon_address()?,
            )?)),
            Some("none") => Ok(Exporter::Noop),
            Some(other) => Err(Error::BadConfig(format!("unknown exporter: {other}"))),
        }
    }
}

impl Client for Exporter {
    fn send<S>(&self, data: &S) -> Result<()>
    where
        S: Serialize,
    {
        match self {
            Self::Stdout(client) => client.send(data),
            Self::Daemon(client) => client.send(data),
            Self::Noop => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn client_prefixes_packets_with_header() {
        assert_eq!(
            DaemonClient::packet(serde_json::json!({
                "foo": "bar"
            }))
            .unwrap(),
            [
                br#"{"format": "json", "version": 1}"# as &[u8],
                &[b'\n'],
                br#"{"foo":"bar"}"#,
            ]
            .concat()
        )
    }

    #[test]
    fn daemon_client_delivers_datagrams() {
        let daemon = UdpSocket::bind("127.0.0.1:0").unwrap();
        daemon
            .set_read_timeout(Some(std::time::Duration::from_secs(5)))
            .unwrap();
        let client = DaemonClient::new(daemon.local_addr().unwrap()).unwrap();
        client.send(&serde_json::json!({ "name": "span" })).unwrap();
        let mut buf = [0u8; 256];
        let n = daemon.recv(&mut buf).unwrap();
        assert!(buf[..n].ends_with(br#"{"name":"span"}"#));
    }

    #[test]
    fn memory_client_clones_share_documents() {
        let client = MemoryClient::new();
        client.clone().send(&serde_json::json!({ "n": 1 })).unwrap();
        client.send(&serde_json::json!({ "n": 2 })).unwrap();
        assert_eq!(
            client.documents(),
            vec![serde_json::json!({ "n": 1 }), serde_json::json!({ "n": 2 })]
        );
    }

    #[test]
    #[serial]
    fn exporter_defaults_to_stdout() {
        std::env::remove_var("TRACEPARENT_LITE_EXPORTER");
        assert!(matches!(
            Exporter::from_lambda_env().unwrap(),
            Exporter::Stdout(_)
        ));
    }

    #[test]
    #[serial]
    fn exporter_from_env() {
        std::env::set_var("TRACEPARENT_LITE_EXPORTER", "none");
        assert!(matches!(
            Exporter::from_lambda_env().unwrap(),
            Exporter::Noop
        ));

        std::env::set_var("TRACEPARENT_LITE_EXPORTER", "daemon");
        std::env::set_var("TRACEPARENT_LITE_DAEMON_ADDRESS", "127.0.0.1:2000");
        assert!(matches!(
            Exporter::from_lambda_env().unwrap(),
            Exporter::Daemon(_)
        ));

        std::env::remove_var("TRACEPARENT_LITE_DAEMON_ADDRESS");
        assert!(matches!(
            Exporter::from_lambda_env(),
            Err(Error::MissingEnvVar("TRACEPARENT_LITE_DAEMON_ADDRESS"))
        ));

        std::env::set_var("TRACEPARENT_LITE_EXPORTER", "zipkin");
        assert!(matches!(
            Exporter::from_lambda_env(),
            Err(Error::BadConfig(_))
        ));
        std::env::remove_var("TRACEPARENT_LITE_EXPORTER");
    }
}
