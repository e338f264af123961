//! # Argument Validation
//!
//! Synchronous checks run before any transport call. Every failure is an
//! `InvalidArgument`, so a bad request never costs a round-trip.

use std::time::Duration;

use bytes::Bytes;

use rkv_common::{SdkError, SdkResult, Ttl};

/// Requires a present, non-blank cache name.
pub(crate) fn cache_name(name: Option<String>) -> SdkResult<String> {
    match name {
        None => Err(SdkError::invalid_argument("Cache name is required")),
        Some(name) if name.trim().is_empty() => {
            Err(SdkError::invalid_argument("Cache name must not be blank"))
        }
        Some(name) => Ok(name),
    }
}

/// Requires a present byte argument. Empty values are allowed.
pub(crate) fn required(arg: Option<Bytes>, what: &str) -> SdkResult<Bytes> {
    arg.ok_or_else(|| SdkError::invalid_argument(format!("{} cannot be null", what)))
}

/// Requires a non-empty list whose elements are all present.
pub(crate) fn required_all(args: Vec<Option<Bytes>>, what: &str) -> SdkResult<Vec<Bytes>> {
    if args.is_empty() {
        return Err(SdkError::invalid_argument(format!("{} must not be empty", what)));
    }
    args.into_iter()
        .map(|arg| {
            arg.ok_or_else(|| SdkError::invalid_argument(format!("{} cannot contain null", what)))
        })
        .collect()
}

/// Rejects negative TTLs.
pub(crate) fn ttl(ttl: Ttl) -> SdkResult<Duration> {
    ttl.to_duration()
        .ok_or_else(|| SdkError::invalid_argument("Cache item TTL cannot be negative"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkv_common::ErrorKind;

    #[test]
    fn cache_name_rules() {
        assert_eq!(cache_name(Some("c".into())).unwrap(), "c");
        assert_eq!(
            cache_name(None).unwrap_err(),
            SdkError::invalid_argument("Cache name is required")
        );
        assert_eq!(
            cache_name(Some("  ".into())).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn required_allows_empty() {
        assert_eq!(required(Some(Bytes::new()), "Key").unwrap(), Bytes::new());
        assert_eq!(
            required(None, "Key").unwrap_err(),
            SdkError::invalid_argument("Key cannot be null")
        );
    }

    #[test]
    fn required_all_checks_each_element() {
        let ok = required_all(vec![Some(Bytes::from_static(b"a"))], "Fields").unwrap();
        assert_eq!(ok.len(), 1);

        let err = required_all(vec![Some(Bytes::new()), None], "Fields").unwrap_err();
        assert_eq!(err, SdkError::invalid_argument("Fields cannot contain null"));

        let err = required_all(Vec::new(), "Fields").unwrap_err();
        assert_eq!(err, SdkError::invalid_argument("Fields must not be empty"));
    }

    #[test]
    fn ttl_rules() {
        assert_eq!(ttl(Ttl::from_secs(0)).unwrap(), Duration::ZERO);
        assert_eq!(ttl(Ttl::from_secs(10)).unwrap(), Duration::from_secs(10));
        assert_eq!(
            ttl(Ttl::from_secs(-1)).unwrap_err(),
            SdkError::invalid_argument("Cache item TTL cannot be negative")
        );
    }
}
