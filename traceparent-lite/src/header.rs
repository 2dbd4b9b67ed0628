//! W3C [Trace Context](https://www.w3.org/TR/trace-context/#traceparent-header)
//! `traceparent` header parser

use crate::{SpanId, TraceId};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Trace flags carried in the last field of a `traceparent` header.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// The caller may have recorded the trace.
    pub const SAMPLED: TraceFlags = TraceFlags(0x01);

    /// No flags set.
    pub const NONE: TraceFlags = TraceFlags(0x00);

    /// Creates flags from their raw byte.
    pub fn new(flags: u8) -> Self {
        TraceFlags(flags)
    }

    /// Whether the sampled flag is set.
    pub fn is_sampled(&self) -> bool {
        self.0 & Self::SAMPLED.0 != 0
    }

    /// Returns a copy with the sampled flag set or cleared.
    pub fn with_sampled(self, sampled: bool) -> Self {
        if sampled {
            TraceFlags(self.0 | Self::SAMPLED.0)
        } else {
            TraceFlags(self.0 & !Self::SAMPLED.0)
        }
    }
}

impl Display for TraceFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// Parsed representation of the `traceparent` request header
#[derive(PartialEq, Clone, Debug)]
pub struct TraceParent {
    pub(crate) trace_id: TraceId,
    pub(crate) parent_id: SpanId,
    pub(crate) flags: TraceFlags,
}

impl TraceParent {
    /// HTTP header name associated with W3C trace context, in its
    /// case-normalized form.
    ///
    /// HTTP header values should be the Display serialization of TraceParent
    /// structs
    pub const NAME: &'static str = "traceparent";

    const VERSION: &'static str = "00";

    /// Creates a new TraceParent.
    pub fn new(trace_id: TraceId, parent_id: SpanId, flags: TraceFlags) -> Self {
        TraceParent {
            trace_id,
            parent_id,
            flags,
        }
    }

    /// Creates a TraceParent that starts a brand new, sampled trace.
    pub fn new_root() -> Self {
        TraceParent::new(TraceId::new(), SpanId::new(), TraceFlags::SAMPLED)
    }

    /// Trace ID.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// ID of the parent span.
    pub fn parent_id(&self) -> &SpanId {
        &self.parent_id
    }

    /// Trace flags.
    pub fn flags(&self) -> TraceFlags {
        self.flags
    }

    /// Creates a new TraceParent with the parent ID replaced.
    pub fn with_parent_id(&self, parent_id: SpanId) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            parent_id,
            flags: self.flags,
        }
    }

    /// Creates a new TraceParent with the sampled flag replaced.
    pub fn with_sampled(&self, sampled: bool) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            parent_id: self.parent_id.clone(),
            flags: self.flags.with_sampled(sampled),
        }
    }
}

impl FromStr for TraceParent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('-').collect();
        let version = fields[0];
        if version.len() != 2 || !version.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid version: `{}`", s));
        }
        if version == "ff" || version.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(format!("unsupported version: `{}`", version));
        }
        // future versions may append fields, version 00 may not
        if version == Self::VERSION && fields.len() != 4 {
            return Err(format!("expected 4 fields in `{}`", s));
        }
        if fields.len() < 4 {
            return Err(format!("expected at least 4 fields in `{}`", s));
        }
        let trace_id = fields[1].parse::<TraceId>()?;
        let parent_id = fields[2].parse::<SpanId>()?;
        let flags = fields[3];
        if flags.len() != 2 || !flags.bytes().all(is_lower_hex) {
            return Err(format!("invalid trace-flags: `{}`", flags));
        }
        let flags = u8::from_str_radix(flags, 16).map_err(|e| e.to_string())?;
        Ok(TraceParent::new(trace_id, parent_id, TraceFlags(flags)))
    }
}

fn is_lower_hex(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

impl Display for TraceParent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            Self::VERSION,
            self.trace_id,
            self.parent_id,
            self.flags
        )
    }
}
