//! Responses for dictionary field operations.
//!
//! A get-fields hit keeps the per-field results in request order; the
//! `value_map_*` projections filter that sequence down to hits on demand.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use rkv_common::text::{
    preview_bytes, preview_text, truncate_to, ERROR_PREVIEW_CHARS, PREVIEW_ITEMS,
};
use rkv_common::{SdkError, SdkResult};

use crate::resolver::{Outcome, Resolved};
use crate::response::{render_error, Render};

/// Result for one dictionary field.
///
/// Returned on its own by `dictionary_get_field` and as the element type of
/// a get-fields hit.
#[derive(Clone, PartialEq, Eq)]
pub enum DictionaryGetFieldResponse {
    Hit { field: Bytes, value: Bytes },
    Miss { field: Bytes },
    Error { field: Bytes, error: SdkError },
}

impl DictionaryGetFieldResponse {
    pub(crate) fn from_resolved(resolved: Resolved) -> Self {
        let field = resolved.key;
        match resolved.outcome {
            Outcome::Hit(value) => DictionaryGetFieldResponse::Hit { field, value },
            Outcome::Miss => DictionaryGetFieldResponse::Miss { field },
            Outcome::Error(error) => DictionaryGetFieldResponse::Error { field, error },
        }
    }

    /// Returns the requested field bytes.
    pub fn field_bytes(&self) -> &[u8] {
        match self {
            DictionaryGetFieldResponse::Hit { field, .. }
            | DictionaryGetFieldResponse::Miss { field }
            | DictionaryGetFieldResponse::Error { field, .. } => field,
        }
    }

    /// Returns the requested field decoded as UTF-8 (lossy).
    pub fn field_string(&self) -> String {
        String::from_utf8_lossy(self.field_bytes()).into_owned()
    }

    /// Returns the value bytes on a hit.
    pub fn value_bytes(&self) -> Option<&[u8]> {
        match self {
            DictionaryGetFieldResponse::Hit { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the value decoded as UTF-8 (lossy) on a hit.
    pub fn value_string(&self) -> Option<String> {
        self.value_bytes()
            .map(|value| String::from_utf8_lossy(value).into_owned())
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, DictionaryGetFieldResponse::Hit { .. })
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            DictionaryGetFieldResponse::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Converts into a `Result`, with `Miss` as `Ok(None)`.
    pub fn into_result(self) -> SdkResult<Option<Bytes>> {
        match self {
            DictionaryGetFieldResponse::Hit { value, .. } => Ok(Some(value)),
            DictionaryGetFieldResponse::Miss { .. } => Ok(None),
            DictionaryGetFieldResponse::Error { error, .. } => Err(error),
        }
    }
}

impl fmt::Debug for DictionaryGetFieldResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = preview_text(self.field_bytes());
        match self {
            DictionaryGetFieldResponse::Hit { value, .. } => {
                write!(f, "Hit({:?}: {}B)", field, value.len())
            }
            DictionaryGetFieldResponse::Miss { .. } => write!(f, "Miss({:?})", field),
            DictionaryGetFieldResponse::Error { error, .. } => write!(
                f,
                "Error({:?}: {})",
                field,
                truncate_to(&error.to_string(), ERROR_PREVIEW_CHARS)
            ),
        }
    }
}

impl Render for DictionaryGetFieldResponse {
    fn render(&self) -> String {
        match self {
            DictionaryGetFieldResponse::Hit { field, value } => format!(
                "Hit: field: \"{}\" value_string: \"{}\" value_bytes: \"{}\"",
                preview_text(field),
                preview_text(value),
                preview_bytes(value)
            ),
            DictionaryGetFieldResponse::Miss { field } => {
                format!("Miss: field: \"{}\"", preview_text(field))
            }
            DictionaryGetFieldResponse::Error { field, error } => {
                format!("{} (field: \"{}\")", render_error(error), preview_text(field))
            }
        }
    }
}

/// Per-field results of a get-fields call against an existing dictionary.
#[derive(Clone, PartialEq, Eq)]
pub struct DictionaryGetFieldsHit {
    responses: Vec<DictionaryGetFieldResponse>,
}

impl DictionaryGetFieldsHit {
    pub(crate) fn from_resolved(resolved: Vec<Resolved>) -> Self {
        DictionaryGetFieldsHit {
            responses: resolved
                .into_iter()
                .map(DictionaryGetFieldResponse::from_resolved)
                .collect(),
        }
    }

    /// All per-field results, in request order.
    pub fn responses(&self) -> &[DictionaryGetFieldResponse] {
        &self.responses
    }

    /// Iterates `(field, value)` pairs of hits, in request order.
    pub fn hits(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> + '_ {
        self.responses.iter().filter_map(|response| match response {
            DictionaryGetFieldResponse::Hit { field, value } => Some((field, value)),
            _ => None,
        })
    }

    /// Text fields to text values. Later duplicates overwrite earlier ones.
    pub fn value_map_string_string(&self) -> HashMap<String, String> {
        self.hits()
            .map(|(field, value)| (lossy(field), lossy(value)))
            .collect()
    }

    /// Alias for [`DictionaryGetFieldsHit::value_map_string_string`].
    pub fn value_map(&self) -> HashMap<String, String> {
        self.value_map_string_string()
    }

    /// Text fields to binary values.
    pub fn value_map_string_bytes(&self) -> HashMap<String, Bytes> {
        self.hits()
            .map(|(field, value)| (lossy(field), value.clone()))
            .collect()
    }

    /// Binary fields to text values.
    pub fn value_map_bytes_string(&self) -> HashMap<Bytes, String> {
        self.hits()
            .map(|(field, value)| (field.clone(), lossy(value)))
            .collect()
    }

    /// Binary fields to binary values.
    pub fn value_map_bytes_bytes(&self) -> HashMap<Bytes, Bytes> {
        self.hits()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    fn counts(&self) -> (usize, usize, usize) {
        self.responses
            .iter()
            .fold((0, 0, 0), |(hit, miss, err), response| match response {
                DictionaryGetFieldResponse::Hit { .. } => (hit + 1, miss, err),
                DictionaryGetFieldResponse::Miss { .. } => (hit, miss + 1, err),
                DictionaryGetFieldResponse::Error { .. } => (hit, miss, err + 1),
            })
    }

    fn render_hits<F>(&self, entry: F) -> String
    where
        F: Fn(&Bytes, &Bytes) -> String,
    {
        let shown: Vec<String> = self
            .hits()
            .take(PREVIEW_ITEMS)
            .map(|(field, value)| entry(field, value))
            .collect();
        let more = if self.hits().nth(PREVIEW_ITEMS).is_some() {
            ", ..."
        } else {
            ""
        };
        format!("\"{}{}\"", shown.join(", "), more)
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl fmt::Debug for DictionaryGetFieldsHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hit, miss, err) = self.counts();
        f.debug_struct("DictionaryGetFieldsHit")
            .field("hit", &hit)
            .field("miss", &miss)
            .field("error", &err)
            .field(
                "first",
                &&self.responses[..self.responses.len().min(PREVIEW_ITEMS)],
            )
            .finish()
    }
}

/// Response for a get-fields call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryGetFieldsResponse {
    /// Dictionary exists; per-field results inside.
    Hit(DictionaryGetFieldsHit),
    /// Dictionary does not exist.
    Miss,
    Error(SdkError),
}

impl DictionaryGetFieldsResponse {
    pub fn is_hit(&self) -> bool {
        matches!(self, DictionaryGetFieldsResponse::Hit(_))
    }

    pub fn hit(&self) -> Option<&DictionaryGetFieldsHit> {
        match self {
            DictionaryGetFieldsResponse::Hit(hit) => Some(hit),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            DictionaryGetFieldsResponse::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_result(self) -> SdkResult<Option<DictionaryGetFieldsHit>> {
        match self {
            DictionaryGetFieldsResponse::Hit(hit) => Ok(Some(hit)),
            DictionaryGetFieldsResponse::Miss => Ok(None),
            DictionaryGetFieldsResponse::Error(err) => Err(err),
        }
    }
}

impl Render for DictionaryGetFieldsResponse {
    fn render(&self) -> String {
        match self {
            DictionaryGetFieldsResponse::Hit(hit) => {
                let (hits, misses, errors) = hit.counts();
                format!(
                    "Hit ({} hit, {} miss, {} error): value_map_string_string: {} \
                     value_map_bytes_bytes: {} value_map_string_bytes: {} \
                     value_map_bytes_string: {}",
                    hits,
                    misses,
                    errors,
                    hit.render_hits(|f, v| format!("{}:{}", preview_text(f), preview_text(v))),
                    hit.render_hits(|f, v| format!("{}:{}", preview_bytes(f), preview_bytes(v))),
                    hit.render_hits(|f, v| format!("{}:{}", preview_text(f), preview_bytes(v))),
                    hit.render_hits(|f, v| format!("{}:{}", preview_bytes(f), preview_text(v))),
                )
            }
            DictionaryGetFieldsResponse::Miss => "Miss".to_string(),
            DictionaryGetFieldsResponse::Error(err) => render_error(err),
        }
    }
}

/// Response for a set-field(s) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySetFieldsResponse {
    Success,
    Error(SdkError),
}

impl DictionarySetFieldsResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, DictionarySetFieldsResponse::Success)
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            DictionarySetFieldsResponse::Error(err) => Some(err),
            DictionarySetFieldsResponse::Success => None,
        }
    }

    pub fn into_result(self) -> SdkResult<()> {
        match self {
            DictionarySetFieldsResponse::Success => Ok(()),
            DictionarySetFieldsResponse::Error(err) => Err(err),
        }
    }
}

impl Render for DictionarySetFieldsResponse {
    fn render(&self) -> String {
        match self {
            DictionarySetFieldsResponse::Success => "Success".to_string(),
            DictionarySetFieldsResponse::Error(err) => render_error(err),
        }
    }
}
