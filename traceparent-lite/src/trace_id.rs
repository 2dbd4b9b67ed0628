use crate::hexbytes::{self, Bytes};
use serde::{Serialize, Serializer};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// W3C trace ID: 16 bytes rendered as 32 lowercase hex digits.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TraceId {
    #[doc(hidden)]
    New([u8; 16]),
    /// A trace ID received from elsewhere, already validated.
    Rendered(String),
}

impl TraceId {
    /// Generates a new random trace ID.
    pub fn new() -> Self {
        loop {
            let bytes: [u8; 16] = rand::random();
            if bytes.iter().any(|b| *b != 0) {
                return TraceId::New(bytes);
            }
        }
    }
}

impl Default for TraceId {
    fn default() -> Self {
        TraceId::new()
    }
}

impl FromStr for TraceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexbytes::validate(s, 32, "trace-id")?;
        Ok(TraceId::Rendered(s.into()))
    }
}

impl Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceId::New(bytes) => write!(f, "{}", Bytes(bytes)),
            TraceId::Rendered(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for TraceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_format() {
        let rendered = TraceId::new().to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.parse::<TraceId>().is_ok());
    }

    #[test]
    fn parse_keeps_rendered_value() {
        assert_eq!(
            "4bf92f3577b34da6a3ce929d0e0e4736".parse::<TraceId>(),
            Ok(TraceId::Rendered("4bf92f3577b34da6a3ce929d0e0e4736".into()))
        );
    }

    #[test]
    fn rejects_invalid_ids() {
        for id in [
            "00000000000000000000000000000000",
            "4bf92f3577b34da6a3ce929d0e0e473",
            "4BF92F3577B34DA6A3CE929D0E0E4736",
        ] {
            assert!(id.parse::<TraceId>().is_err(), "accepted `{id}`");
        }
    }
}
