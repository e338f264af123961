//! Responses for list operations.

use rkv_common::{SdkError, SdkResult};

use crate::response::{render_error, Render};

/// Response for concatenating values to the front of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListConcatenateFrontResponse {
    /// Values were added; carries the list length afterwards.
    Success { list_length: u64 },
    Error(SdkError),
}

impl ListConcatenateFrontResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ListConcatenateFrontResponse::Success { .. })
    }

    pub fn list_length(&self) -> Option<u64> {
        match self {
            ListConcatenateFrontResponse::Success { list_length } => Some(*list_length),
            ListConcatenateFrontResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            ListConcatenateFrontResponse::Error(err) => Some(err),
            ListConcatenateFrontResponse::Success { .. } => None,
        }
    }

    /// Converts into a `Result` carrying the new list length.
    pub fn into_result(self) -> SdkResult<u64> {
        match self {
            ListConcatenateFrontResponse::Success { list_length } => Ok(list_length),
            ListConcatenateFrontResponse::Error(err) => Err(err),
        }
    }
}

impl Render for ListConcatenateFrontResponse {
    fn render(&self) -> String {
        match self {
            ListConcatenateFrontResponse::Success { list_length } => {
                format!("Success: list_length: {}", list_length)
            }
            ListConcatenateFrontResponse::Error(err) => render_error(err),
        }
    }
}

/// Response for removing every occurrence of a value from a list.
///
/// Removing a value that is not present, or from a list that does not
/// exist, is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRemoveValueResponse {
    Success,
    Error(SdkError),
}

impl ListRemoveValueResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ListRemoveValueResponse::Success)
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            ListRemoveValueResponse::Error(err) => Some(err),
            ListRemoveValueResponse::Success => None,
        }
    }

    pub fn into_result(self) -> SdkResult<()> {
        match self {
            ListRemoveValueResponse::Success => Ok(()),
            ListRemoveValueResponse::Error(err) => Err(err),
        }
    }
}

impl Render for ListRemoveValueResponse {
    fn render(&self) -> String {
        match self {
            ListRemoveValueResponse::Success => "Success".to_string(),
            ListRemoveValueResponse::Error(err) => render_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkv_common::TransportKind;

    #[test]
    fn concatenate_success_exposes_length() {
        let response = ListConcatenateFrontResponse::Success { list_length: 3 };
        assert_eq!(response.list_length(), Some(3));
        assert_eq!(response.render(), "Success: list_length: 3");
        assert_eq!(response.into_result(), Ok(3));
    }

    #[test]
    fn long_error_messages_are_capped() {
        let err = SdkError::transport(TransportKind::Server, "x".repeat(5_000));
        let response = ListRemoveValueResponse::Error(err.clone());
        assert!(response.render().len() < 200);
        assert_eq!(response.error(), Some(&err));
        assert_eq!(response.into_result(), Err(err));
    }
}
