// rkv-common - Shared types and error taxonomy for the RemoteKV client
//
// This crate defines what a transport hands back (result codes and raw
// items), how caller arguments are normalized, and how failures are classified.

pub mod error;
pub mod protocol;
pub mod text;
pub mod types;

// Re-export for convenience
pub use error::*;
pub use protocol::*;
pub use types::*;
