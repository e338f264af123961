//! Responses for single-item operations: get, set, delete.

use std::fmt;

use bytes::Bytes;

use rkv_common::text::{preview_bytes, preview_text};
use rkv_common::{SdkError, SdkResult};

use crate::resolver::Outcome;
use crate::response::{render_error, Render};

/// Value found by a get.
#[derive(Clone, PartialEq, Eq)]
pub struct GetHit {
    value: Bytes,
}

impl GetHit {
    pub(crate) fn new(value: Bytes) -> Self {
        GetHit { value }
    }

    /// Returns the raw value bytes.
    #[inline]
    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }

    /// Returns the value decoded as UTF-8, replacing invalid sequences.
    pub fn value_string(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    /// Alias for [`GetHit::value_string`].
    pub fn value(&self) -> String {
        self.value_string()
    }

    /// Consumes the hit and returns the shared value buffer.
    pub fn into_bytes(self) -> Bytes {
        self.value
    }
}

impl fmt::Debug for GetHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.len() <= 32 {
            write!(f, "GetHit({:?})", String::from_utf8_lossy(&self.value))
        } else {
            write!(f, "GetHit({}B)", self.value.len())
        }
    }
}

/// Response for a get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetResponse {
    /// Key exists.
    Hit(GetHit),
    /// Key does not exist.
    Miss,
    Error(SdkError),
}

impl GetResponse {
    pub(crate) fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Hit(value) => GetResponse::Hit(GetHit::new(value)),
            Outcome::Miss => GetResponse::Miss,
            Outcome::Error(err) => GetResponse::Error(err),
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, GetResponse::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, GetResponse::Miss)
    }

    /// Returns the hit, if any.
    pub fn hit(&self) -> Option<&GetHit> {
        match self {
            GetResponse::Hit(hit) => Some(hit),
            _ => None,
        }
    }

    /// Returns the error cause, if any.
    pub fn error(&self) -> Option<&SdkError> {
        match self {
            GetResponse::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Converts into a `Result`, with `Miss` as `Ok(None)`.
    pub fn into_result(self) -> SdkResult<Option<GetHit>> {
        match self {
            GetResponse::Hit(hit) => Ok(Some(hit)),
            GetResponse::Miss => Ok(None),
            GetResponse::Error(err) => Err(err),
        }
    }
}

impl Render for GetResponse {
    fn render(&self) -> String {
        match self {
            GetResponse::Hit(hit) => format!(
                "Hit: value_string: \"{}\" value_bytes: \"{}\"",
                preview_text(hit.value_bytes()),
                preview_bytes(hit.value_bytes())
            ),
            GetResponse::Miss => "Miss".to_string(),
            GetResponse::Error(err) => render_error(err),
        }
    }
}

/// Value stored by a successful set.
#[derive(Clone, PartialEq, Eq)]
pub struct SetSuccess {
    value: Bytes,
}

impl SetSuccess {
    pub(crate) fn new(value: Bytes) -> Self {
        SetSuccess { value }
    }

    /// Returns the stored value bytes.
    #[inline]
    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }

    /// Returns the stored value decoded as UTF-8 (lossy).
    pub fn value_string(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

impl fmt::Debug for SetSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetSuccess({}B)", self.value.len())
    }
}

/// Response for a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetResponse {
    Success(SetSuccess),
    Error(SdkError),
}

impl SetResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, SetResponse::Success(_))
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            SetResponse::Error(err) => Some(err),
            SetResponse::Success(_) => None,
        }
    }

    pub fn into_result(self) -> SdkResult<SetSuccess> {
        match self {
            SetResponse::Success(success) => Ok(success),
            SetResponse::Error(err) => Err(err),
        }
    }
}

impl Render for SetResponse {
    fn render(&self) -> String {
        match self {
            SetResponse::Success(success) => format!(
                "Success: value_string: \"{}\" value_bytes: \"{}\"",
                preview_text(success.value_bytes()),
                preview_bytes(success.value_bytes())
            ),
            SetResponse::Error(err) => render_error(err),
        }
    }
}

/// Response for a delete. Deleting a missing key is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteResponse {
    Success,
    Error(SdkError),
}

impl DeleteResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, DeleteResponse::Success)
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            DeleteResponse::Error(err) => Some(err),
            DeleteResponse::Success => None,
        }
    }

    pub fn into_result(self) -> SdkResult<()> {
        match self {
            DeleteResponse::Success => Ok(()),
            DeleteResponse::Error(err) => Err(err),
        }
    }
}

impl Render for DeleteResponse {
    fn render(&self) -> String {
        match self {
            DeleteResponse::Success => "Success".to_string(),
            DeleteResponse::Error(err) => render_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkv_common::ErrorKind;

    #[test]
    fn hit_accessors_decode_payload() {
        let response = GetResponse::from_outcome(Outcome::Hit(Bytes::from("héllo")));
        let hit = response.hit().unwrap();
        assert_eq!(hit.value_bytes(), "héllo".as_bytes());
        assert_eq!(hit.value_string(), "héllo");
        assert_eq!(hit.value(), "héllo");
        assert!(response.is_hit());
    }

    #[test]
    fn invalid_utf8_stays_available_as_bytes() {
        let hit = GetHit::new(Bytes::from_static(&[0xff, 0x61]));
        assert_eq!(hit.value_bytes(), &[0xff, 0x61]);
        assert_eq!(hit.value_string(), "\u{fffd}a");
    }

    #[test]
    fn miss_has_no_hit() {
        let response = GetResponse::from_outcome(Outcome::Miss);
        assert!(response.is_miss());
        assert!(response.hit().is_none());
        assert!(matches!(response.into_result(), Ok(None)));
    }

    #[test]
    fn error_converts_to_err() {
        let response =
            GetResponse::from_outcome(Outcome::Error(SdkError::unexpected_result("Invalid")));
        assert_eq!(
            response.error().map(SdkError::kind),
            Some(ErrorKind::UnexpectedResult)
        );
        assert!(response.into_result().is_err());
    }

    #[test]
    fn large_hit_renders_bounded() {
        let value = "v".repeat(10_000);
        let response = GetResponse::Hit(GetHit::new(Bytes::from(value)));
        let rendered = response.render();
        assert!(rendered.len() < 100, "rendered {} chars", rendered.len());
        assert!(rendered.contains("vvvvvvvvvvvvvvvvvvvv..."));

        let debug = format!("{:?}", response);
        assert_eq!(debug, "Hit(GetHit(10000B))");
    }

    #[test]
    fn small_hit_renders_whole_value() {
        let response = GetResponse::Hit(GetHit::new(Bytes::from_static(b"hi")));
        assert_eq!(
            response.render(),
            "Hit: value_string: \"hi\" value_bytes: \"6869\""
        );
    }

    #[test]
    fn set_and_delete_render() {
        let set = SetResponse::Success(SetSuccess::new(Bytes::from_static(b"ok")));
        assert_eq!(set.render(), "Success: value_string: \"ok\" value_bytes: \"6f6b\"");
        assert_eq!(set.clone().into_result().unwrap().value_string(), "ok");

        let delete = DeleteResponse::Error(SdkError::invalid_argument("Key cannot be null"));
        assert_eq!(
            delete.render(),
            "Error: invalid argument: Key cannot be null"
        );
        assert!(DeleteResponse::Success.into_result().is_ok());
    }
}
