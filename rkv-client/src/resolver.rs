//! # Response Resolution
//!
//! Purpose: Turn raw per-item results from a transport into the closed
//! Hit/Miss/Error outcome set, one item at a time or as an ordered batch.
//!
//! ## Design Principles
//! 1. **Total Coverage**: Every `ResultCode`, including ones this client has
//!    never seen, maps to exactly one outcome. Unknown codes fall through
//!    to `Error`.
//! 2. **Positional Batches**: The i-th raw result belongs to the i-th
//!    requested key. Output order equals request order.
//! 3. **Loud Defects**: A `Hit` with no payload, or a batch whose lengths
//!    disagree, means the transport is broken. Both panic instead of
//!    degrading into a `Miss`.
//! 4. **Pure**: No state, no locks, no I/O, no logging. Callers decide how
//!    to report the errors produced here.

use bytes::Bytes;

use rkv_common::{RawItem, ResultCode, SdkError, SdkResult};

/// Classified result for a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Hit(Bytes),
    Miss,
    Error(SdkError),
}

/// One item of a batch: the requested key and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub key: Bytes,
    pub outcome: Outcome,
}

/// Resolves one raw result, building the error cause with `classify`.
///
/// # Panics
/// Panics when `code` is `Hit` and `payload` is `None`.
pub fn resolve<F>(code: ResultCode, payload: Option<Bytes>, classify: F) -> Outcome
where
    F: FnOnce(ResultCode) -> SdkError,
{
    match code {
        ResultCode::Hit => match payload {
            Some(value) => Outcome::Hit(value),
            None => panic!("transport reported a Hit without a payload"),
        },
        ResultCode::Miss => Outcome::Miss,
        other => Outcome::Error(classify(other)),
    }
}

/// Resolves one raw result with the default `UnexpectedResult` classifier.
pub fn resolve_item(raw: RawItem) -> Outcome {
    resolve(raw.code, raw.payload, |code| SdkError::unexpected_result(code))
}

/// Resolves a batch, pairing `keys[i]` with `raws[i]`.
///
/// # Panics
/// Panics when the two sequences differ in length.
pub fn resolve_batch(keys: Vec<Bytes>, raws: Vec<RawItem>) -> Vec<Resolved> {
    assert_eq!(
        keys.len(),
        raws.len(),
        "batch result count does not match requested key count"
    );

    keys.into_iter()
        .zip(raws)
        .map(|(key, raw)| Resolved {
            key,
            outcome: resolve_item(raw),
        })
        .collect()
}

/// Resolves an acknowledgement for a write. Only `Ok` counts as success.
pub fn resolve_ack(raw: &RawItem) -> SdkResult<()> {
    match raw.code {
        ResultCode::Ok => Ok(()),
        other => Err(SdkError::unexpected_result(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkv_common::ErrorKind;

    #[test]
    fn hit_carries_exact_payload() {
        for payload in [&b""[..], b"hello", "héllo wörld".as_bytes(), &[0u8, 159, 146, 150]] {
            let outcome = resolve_item(RawItem::hit(Bytes::copy_from_slice(payload)));
            assert_eq!(outcome, Outcome::Hit(Bytes::copy_from_slice(payload)));
        }
    }

    #[test]
    fn miss_has_no_payload() {
        assert_eq!(resolve_item(RawItem::miss()), Outcome::Miss);
        // A stray payload on a miss is ignored.
        assert_eq!(
            resolve(ResultCode::Miss, Some(Bytes::from_static(b"x")), |code| {
                SdkError::unexpected_result(code)
            }),
            Outcome::Miss
        );
    }

    #[test]
    fn other_codes_become_errors() {
        for code in [
            ResultCode::Ok,
            ResultCode::Invalid,
            ResultCode::Unrecognized(7),
            ResultCode::Unrecognized(-1),
        ] {
            match resolve_item(RawItem::with_code(code)) {
                Outcome::Error(err) => {
                    assert_eq!(err.kind(), ErrorKind::UnexpectedResult);
                    assert_eq!(err.message(), code.to_string());
                }
                other => panic!("expected error for {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn custom_classifier_is_used() {
        let outcome = resolve(ResultCode::Invalid, None, |code| {
            SdkError::invalid_argument(format!("rejected: {code}"))
        });
        assert_eq!(
            outcome,
            Outcome::Error(SdkError::invalid_argument("rejected: Invalid"))
        );
    }

    #[test]
    #[should_panic(expected = "Hit without a payload")]
    fn hit_without_payload_panics() {
        resolve_item(RawItem::with_code(ResultCode::Hit));
    }

    #[test]
    fn batch_preserves_order_and_keys() {
        let keys: Vec<Bytes> = ["a", "b", "c", "d"]
            .iter()
            .map(|k| Bytes::copy_from_slice(k.as_bytes()))
            .collect();
        let raws = vec![
            RawItem::hit("1"),
            RawItem::miss(),
            RawItem::with_code(ResultCode::Unrecognized(9)),
            RawItem::hit("4"),
        ];

        let resolved = resolve_batch(keys.clone(), raws);
        assert_eq!(resolved.len(), keys.len());
        for (item, key) in resolved.iter().zip(&keys) {
            assert_eq!(&item.key, key);
        }
        assert_eq!(resolved[0].outcome, Outcome::Hit(Bytes::from_static(b"1")));
        assert_eq!(resolved[1].outcome, Outcome::Miss);
        assert!(matches!(resolved[2].outcome, Outcome::Error(_)));
        assert_eq!(resolved[3].outcome, Outcome::Hit(Bytes::from_static(b"4")));
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(resolve_batch(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    #[should_panic(expected = "batch result count")]
    fn batch_length_mismatch_panics() {
        resolve_batch(vec![Bytes::from_static(b"a")], Vec::new());
    }

    #[test]
    fn ack_accepts_only_ok() {
        assert!(resolve_ack(&RawItem::with_code(ResultCode::Ok)).is_ok());
        let err = resolve_ack(&RawItem::miss()).unwrap_err();
        assert_eq!(err, SdkError::unexpected_result("Miss"));
    }
}
