//! # RemoteKV Client
//!
//! Purpose: Typed, synchronous client for a remote key-value cache, with
//! scalar items, dictionaries, and lists.
//!
//! ## Design Principles
//! 1. **Errors as Values**: Every operation returns a response enum whose
//!    `Error` variant carries an `SdkError`; nothing is thrown.
//! 2. **Positional Batches**: Multi-field reads keep request order, so the
//!    i-th result always belongs to the i-th requested field.
//! 3. **Bounded Diagnostics**: Responses render and debug-print with
//!    truncated previews, safe to log at any payload size.
//! 4. **Object Pool Pattern**: The bundled RESP transport reuses TCP
//!    connections across calls.
//!
//! ```no_run
//! use rkv_client::{CacheClient, GetResponse, Ttl};
//!
//! let client = CacheClient::connect("127.0.0.1:6379")?;
//! client.set("users", "42", "alice", Ttl::from_secs(60));
//! if let GetResponse::Hit(hit) = client.get("users", "42") {
//!     assert_eq!(hit.value_string(), "alice");
//! }
//! # Ok::<(), rkv_client::SdkError>(())
//! ```

mod client;
mod config;
mod pool;
mod resolver;
mod resp;
mod response;
mod transport;
mod validation;

pub use client::CacheClient;
pub use config::ClientConfig;
pub use pool::{ConnectionPool, PoolConfig};
pub use resolver::{resolve, resolve_ack, resolve_batch, resolve_item, Outcome, Resolved};
pub use response::{
    DeleteResponse, DictionaryGetFieldResponse, DictionaryGetFieldsHit,
    DictionaryGetFieldsResponse, DictionarySetFieldsResponse, GetHit, GetResponse,
    ListConcatenateFrontResponse, ListRemoveValueResponse, Render, SetResponse, SetSuccess,
};
pub use transport::{Reply, Request, RespTransport, Transport};

pub use rkv_common::{
    ErrorKind, IntoBytesArg, IntoTextArg, RawItem, ResultCode, SdkError, SdkResult,
    TransportKind, Ttl,
};
