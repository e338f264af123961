//! # Argument Types
//!
//! Caller-facing argument normalization and the item TTL type.
//!
//! ## Design Principles
//!
//! 1. **Text or Bytes**: Keys, fields, and values may be passed as `&str`,
//!    `String`, `&[u8]`, `Vec<u8>`, byte arrays, or `Bytes`. All of them are
//!    normalized to `Bytes` before they reach the wire or the resolver.
//!
//! 2. **Absence is Explicit**: Wrapping any argument in `Option` lets a caller
//!    forward a possibly-missing value; `None` normalizes to "absent" and the
//!    client reports it as an invalid argument instead of panicking.
//!
//! 3. **One Impl per Representation**: Every representation has its own impl,
//!    so each one's absence path is checked independently.
//!
//! 4. **Signed TTL**: `Ttl` keeps a signed millisecond count so a negative
//!    value can be expressed, and then rejected, at the boundary.

use std::time::Duration;

use bytes::Bytes;

/// Conversion into an opaque byte argument (key, field, value, list name).
///
/// Returns `None` when the argument is absent.
pub trait IntoBytesArg {
    fn into_bytes_arg(self) -> Option<Bytes>;
}

impl IntoBytesArg for &str {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self.as_bytes()))
    }
}

impl IntoBytesArg for String {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::from(self))
    }
}

impl IntoBytesArg for &String {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self.as_bytes()))
    }
}

impl IntoBytesArg for &[u8] {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self))
    }
}

impl<const N: usize> IntoBytesArg for &[u8; N] {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self))
    }
}

impl IntoBytesArg for Vec<u8> {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::from(self))
    }
}

impl IntoBytesArg for &Vec<u8> {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self))
    }
}

impl IntoBytesArg for Bytes {
    fn into_bytes_arg(self) -> Option<Bytes> {
        Some(self)
    }
}

impl<T: IntoBytesArg> IntoBytesArg for Option<T> {
    fn into_bytes_arg(self) -> Option<Bytes> {
        self.and_then(IntoBytesArg::into_bytes_arg)
    }
}

/// Conversion into a text argument (cache name).
///
/// Returns `None` when the argument is absent.
pub trait IntoTextArg {
    fn into_text_arg(self) -> Option<String>;
}

impl IntoTextArg for &str {
    fn into_text_arg(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl IntoTextArg for String {
    fn into_text_arg(self) -> Option<String> {
        Some(self)
    }
}

impl IntoTextArg for &String {
    fn into_text_arg(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: IntoTextArg> IntoTextArg for Option<T> {
    fn into_text_arg(self) -> Option<String> {
        self.and_then(IntoTextArg::into_text_arg)
    }
}

/// Time-to-live for a cache item, in milliseconds.
///
/// Built from a `Duration` it is always non-negative; the signed
/// constructors exist so callers holding signed offsets can pass them
/// through and get a validation error instead of a wrapped-around TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(i64);

impl Ttl {
    /// Creates a TTL from signed milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Ttl(millis)
    }

    /// Creates a TTL from signed seconds.
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Ttl(secs.saturating_mul(1000))
    }

    /// Returns the TTL in milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns true if the TTL is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts to a `Duration`, or `None` when negative.
    pub fn to_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_millis)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_bytes_normalize_to_same_bytes() {
        let from_str = "alpha".into_bytes_arg().unwrap();
        let from_string = String::from("alpha").into_bytes_arg().unwrap();
        let from_slice = (b"alpha" as &[u8]).into_bytes_arg().unwrap();
        let from_array = b"alpha".into_bytes_arg().unwrap();
        let from_vec = b"alpha".to_vec().into_bytes_arg().unwrap();
        let from_bytes = Bytes::from_static(b"alpha").into_bytes_arg().unwrap();

        assert_eq!(from_str, from_string);
        assert_eq!(from_str, from_slice);
        assert_eq!(from_str, from_array);
        assert_eq!(from_str, from_vec);
        assert_eq!(from_str, from_bytes);
    }

    #[test]
    fn absent_arguments_normalize_to_none() {
        assert!(None::<&str>.into_bytes_arg().is_none());
        assert!(None::<String>.into_bytes_arg().is_none());
        assert!(None::<&[u8]>.into_bytes_arg().is_none());
        assert!(None::<Vec<u8>>.into_bytes_arg().is_none());
        assert!(None::<Bytes>.into_bytes_arg().is_none());
        assert!(None::<&str>.into_text_arg().is_none());
        assert!(None::<String>.into_text_arg().is_none());
    }

    #[test]
    fn empty_arguments_are_present() {
        assert_eq!("".into_bytes_arg(), Some(Bytes::new()));
        assert_eq!(Vec::<u8>::new().into_bytes_arg(), Some(Bytes::new()));
        assert_eq!(Some("").into_text_arg(), Some(String::new()));
    }

    #[test]
    fn ttl_conversions() {
        let ttl = Ttl::from(Duration::from_secs(10));
        assert_eq!(ttl.as_millis(), 10_000);
        assert!(!ttl.is_negative());
        assert_eq!(ttl.to_duration(), Some(Duration::from_secs(10)));

        let negative = Ttl::from_secs(-1);
        assert!(negative.is_negative());
        assert_eq!(negative.to_duration(), None);

        assert_eq!(Ttl::from_secs(i64::MAX).as_millis(), i64::MAX);
    }
}
