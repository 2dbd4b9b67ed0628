//! Lowercase hex rendering and validation shared by trace and span ids.

use std::fmt;

/// Displays a byte slice as lowercase hex digits.
pub(crate) struct Bytes<'a>(pub(crate) &'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Checks that `s` is exactly `len` lowercase hex digits and not all zeros.
pub(crate) fn validate(s: &str, len: usize, what: &str) -> Result<(), String> {
    if s.len() != len {
        return Err(format!("{what} must be {len} hex digits: `{s}`"));
    }
    if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(format!("{what} must be lowercase hex: `{s}`"));
    }
    if s.bytes().all(|b| b == b'0') {
        return Err(format!("{what} must not be all zeros"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lowercase_hex() {
        assert_eq!(Bytes(&[0x00, 0x0a, 0xff]).to_string(), "000aff");
    }

    #[test]
    fn validates_length_case_and_zeros() {
        assert!(validate("00f067aa0ba902b7", 16, "parent-id").is_ok());
        assert!(validate("00f067aa0ba902b", 16, "parent-id").is_err());
        assert!(validate("00F067AA0BA902B7", 16, "parent-id").is_err());
        assert!(validate("0000000000000000", 16, "parent-id").is_err());
    }
}
