use crate::hexbytes::{self, Bytes};
use serde::{Serialize, Serializer};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Unique identifier of a span: 8 bytes rendered as 16 lowercase hex digits.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SpanId {
    #[doc(hidden)]
    New([u8; 8]),
    /// A span ID received from elsewhere, already validated.
    Rendered(String),
}

impl SpanId {
    /// Generates a new random span ID.
    pub fn new() -> Self {
        loop {
            let bytes: [u8; 8] = rand::random();
            if bytes.iter().any(|b| *b != 0) {
                return SpanId::New(bytes);
            }
        }
    }
}

impl Default for SpanId {
    fn default() -> Self {
        SpanId::new()
    }
}

impl FromStr for SpanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexbytes::validate(s, 16, "parent-id")?;
        Ok(SpanId::Rendered(s.into()))
    }
}

impl Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanId::New(bytes) => write!(f, "{}", Bytes(bytes)),
            SpanId::Rendered(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for SpanId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
