//! # Error Taxonomy
//!
//! Purpose: Classify every failure the SDK can report into a small, closed
//! set of kinds so callers can match on them without string inspection.
//!
//! ## Design Principles
//! 1. **Errors as Values**: Responses carry `SdkError` as data; converting to
//!    `Err` is opt-in via `into_result()` on each response.
//! 2. **Cheap to Share**: Causes hold owned strings so the error is `Clone`
//!    and responses stay `Send + Sync`.
//! 3. **Forward Compatible**: Unknown backend codes are errors, never panics.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::text::{truncate_to, ERROR_PREVIEW_CHARS};

/// Result type used across the SDK.
pub type SdkResult<T> = Result<T, SdkError>;

/// Coarse classification of an [`SdkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied a missing or out-of-range argument.
    InvalidArgument,
    /// Backend returned a per-item result code the SDK does not expect.
    UnexpectedResult,
    /// The call could not be completed against the backend.
    Transport,
}

/// Sub-classification for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Socket connect/read/write failure.
    Connection,
    /// Read, write, or connect deadline elapsed.
    Timeout,
    /// Backend rejected the credentials of the connection.
    Authentication,
    /// Reply framing was malformed or did not match the command.
    Protocol,
    /// Backend answered with an error reply.
    Server,
    /// Pool is at capacity and no idle connections are available.
    PoolExhausted,
    /// Address could not be parsed into a socket address.
    InvalidAddress,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Connection => "connection",
            TransportKind::Timeout => "timeout",
            TransportKind::Authentication => "authentication",
            TransportKind::Protocol => "protocol",
            TransportKind::Server => "server",
            TransportKind::PoolExhausted => "pool exhausted",
            TransportKind::InvalidAddress => "invalid address",
        };
        f.write_str(name)
    }
}

/// Classified cause carried by every `Error` response variant.
///
/// `Debug` output truncates messages so server text cannot blow up a log line.
#[derive(Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// Argument validation failed before any network call.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Per-item result code outside {Hit, Miss}.
    #[error("unexpected result code from backend: {code}")]
    UnexpectedResult { code: String },

    /// Backend call failed as a whole; no per-item results exist.
    #[error("{kind} error: {message}")]
    Transport { kind: TransportKind, message: String },
}

impl SdkError {
    /// Builds an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SdkError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Builds an `UnexpectedResult` error from the literal code rendering.
    pub fn unexpected_result(code: impl fmt::Display) -> Self {
        SdkError::UnexpectedResult {
            code: code.to_string(),
        }
    }

    /// Builds a `Transport` error of the given kind.
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        SdkError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            SdkError::UnexpectedResult { .. } => ErrorKind::UnexpectedResult,
            SdkError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Returns the transport sub-kind, if this is a transport failure.
    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            SdkError::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            SdkError::InvalidArgument { message } => message,
            SdkError::UnexpectedResult { code } => code,
            SdkError::Transport { message, .. } => message,
        }
    }
}

impl fmt::Debug for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounded = |text: &str| truncate_to(text, ERROR_PREVIEW_CHARS);
        match self {
            SdkError::InvalidArgument { message } => f
                .debug_struct("InvalidArgument")
                .field("message", &bounded(message))
                .finish(),
            SdkError::UnexpectedResult { code } => f
                .debug_struct("UnexpectedResult")
                .field("code", &bounded(code))
                .finish(),
            SdkError::Transport { kind, message } => f
                .debug_struct("Transport")
                .field("kind", kind)
                .field("message", &bounded(message))
                .finish(),
        }
    }
}

impl From<io::Error> for SdkError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportKind::Timeout,
            _ => TransportKind::Connection,
        };
        SdkError::transport(kind, err.to_string())
    }
}
