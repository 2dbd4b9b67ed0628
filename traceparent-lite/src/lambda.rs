//! Environment variables read on a Lambda execution environment.

use std::env;
use std::net::SocketAddr;

use crate::{Error, Result};

const EXPORTER: &str = "TRACEPARENT_LITE_EXPORTER";
const DAEMON_ADDRESS: &str = "TRACEPARENT_LITE_DAEMON_ADDRESS";

pub(crate) fn exporter_kind() -> Result<Option<String>> {
    match env::var(EXPORTER) {
        Ok(value) => Ok(Some(value.trim().to_ascii_lowercase())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(Error::BadConfig(format!("{EXPORTER} is not valid unicode")))
        }
    }
}

pub(crate) fn daemon_address() -> Result<SocketAddr> {
    env::var(DAEMON_ADDRESS)
        .map_err(|_| Error::MissingEnvVar(DAEMON_ADDRESS))?
        .parse::<SocketAddr>()
        .map_err(|e| Error::BadConfig(format!("invalid trace daemon address: {e}")))
}
