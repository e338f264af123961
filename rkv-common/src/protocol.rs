//! # Raw Result Structures
//!
//! Purpose: Define the wire-agnostic shape of what a transport hands back for
//! one requested item: a result code plus an optional payload.
//!
//! ## Usage Notes
//!
//! - `ResultCode` mirrors the cache protocol's per-item result enum
//!   (0 = Invalid, 1 = Ok, 2 = Hit, 3 = Miss). Any other number is kept as
//!   `Unrecognized` so newer servers never break older clients.
//! - `RawItem::payload` is meaningful only when `code == Hit`.

use std::fmt;

use bytes::Bytes;

/// Per-item status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Invalid,
    Ok,
    Hit,
    Miss,
    /// A code this client version does not know about.
    Unrecognized(i32),
}

impl ResultCode {
    /// Decodes a numeric wire code.
    pub const fn from_i32(code: i32) -> Self {
        match code {
            0 => ResultCode::Invalid,
            1 => ResultCode::Ok,
            2 => ResultCode::Hit,
            3 => ResultCode::Miss,
            other => ResultCode::Unrecognized(other),
        }
    }

    /// Returns the numeric wire code.
    pub const fn as_i32(&self) -> i32 {
        match self {
            ResultCode::Invalid => 0,
            ResultCode::Ok => 1,
            ResultCode::Hit => 2,
            ResultCode::Miss => 3,
            ResultCode::Unrecognized(other) => *other,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Invalid => f.write_str("Invalid"),
            ResultCode::Ok => f.write_str("Ok"),
            ResultCode::Hit => f.write_str("Hit"),
            ResultCode::Miss => f.write_str("Miss"),
            ResultCode::Unrecognized(code) => write!(f, "UNRECOGNIZED({})", code),
        }
    }
}

/// Raw result for a single requested item, as produced by a transport.
#[derive(Clone, PartialEq, Eq)]
pub struct RawItem {
    pub code: ResultCode,
    pub payload: Option<Bytes>,
}

impl RawItem {
    /// A hit carrying `payload`.
    pub fn hit(payload: impl Into<Bytes>) -> Self {
        RawItem {
            code: ResultCode::Hit,
            payload: Some(payload.into()),
        }
    }

    /// A miss.
    pub fn miss() -> Self {
        RawItem {
            code: ResultCode::Miss,
            payload: None,
        }
    }

    /// An item with an arbitrary code and no payload.
    pub fn with_code(code: ResultCode) -> Self {
        RawItem {
            code,
            payload: None,
        }
    }
}

// Payloads can be large; only their length is shown.
impl fmt::Debug for RawItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "RawItem({}, {}B)", self.code, payload.len()),
            None => write!(f, "RawItem({})", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_roundtrip() {
        for code in [
            ResultCode::Invalid,
            ResultCode::Ok,
            ResultCode::Hit,
            ResultCode::Miss,
        ] {
            assert_eq!(ResultCode::from_i32(code.as_i32()), code);
        }
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let code = ResultCode::from_i32(42);
        assert_eq!(code, ResultCode::Unrecognized(42));
        assert_eq!(code.as_i32(), 42);
        assert_eq!(code.to_string(), "UNRECOGNIZED(42)");
    }

    #[test]
    fn debug_hides_payload() {
        let item = RawItem::hit(vec![b'x'; 4096]);
        assert_eq!(format!("{:?}", item), "RawItem(Hit, 4096B)");
        assert_eq!(format!("{:?}", RawItem::miss()), "RawItem(Miss)");
    }
}
