//! # Transport Seam
//!
//! Purpose: Separate "how bytes reach the cache" from "what the reply means".
//! A `Transport` takes a validated `Request` and returns a `Reply` made of
//! raw result codes; the resolver does the rest.
//!
//! `RespTransport` is the bundled implementation: RESP2 over pooled TCP.
//!
//! ## Command Mapping
//!
//! ```text
//! Get                  GET    <cache>:<key>                   bulk | null
//! Set                  SET    <cache>:<key> <value> PX <ms>   +OK
//! Delete               DEL    <cache>:<key>                   :n
//! DictionaryGetField   HGET   <cache>:<dict> <field>          bulk | null
//! DictionaryGetFields  HMGET  <cache>:<dict> <f1> .. <fn>     *n of bulk | null
//! DictionarySetFields  HSET   <cache>:<dict> <f1> <v1> ..     :n
//! ListConcatenateFront LPUSH  <cache>:<list> <vn> .. <v1>     :len
//! ListRemoveValue      LREM   <cache>:<list> 0 <value>        :n
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::warn;

use rkv_common::{RawItem, ResultCode, SdkError, SdkResult, TransportKind};

use crate::pool::{ConnectionPool, PoolConfig};
use crate::resp::RespValue;

/// A validated request, one variant per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get {
        cache: String,
        key: Bytes,
    },
    Set {
        cache: String,
        key: Bytes,
        value: Bytes,
        ttl: Duration,
    },
    Delete {
        cache: String,
        key: Bytes,
    },
    DictionaryGetField {
        cache: String,
        dictionary: Bytes,
        field: Bytes,
    },
    DictionaryGetFields {
        cache: String,
        dictionary: Bytes,
        fields: Vec<Bytes>,
    },
    DictionarySetFields {
        cache: String,
        dictionary: Bytes,
        fields: Vec<(Bytes, Bytes)>,
    },
    ListConcatenateFront {
        cache: String,
        list: Bytes,
        values: Vec<Bytes>,
    },
    ListRemoveValue {
        cache: String,
        list: Bytes,
        value: Bytes,
    },
}

impl Request {
    /// Short operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Request::Get { .. } => "get",
            Request::Set { .. } => "set",
            Request::Delete { .. } => "delete",
            Request::DictionaryGetField { .. } => "dictionary_get_field",
            Request::DictionaryGetFields { .. } => "dictionary_get_fields",
            Request::DictionarySetFields { .. } => "dictionary_set_fields",
            Request::ListConcatenateFront { .. } => "list_concatenate_front",
            Request::ListRemoveValue { .. } => "list_remove_value",
        }
    }

    /// Target cache name.
    pub fn cache(&self) -> &str {
        match self {
            Request::Get { cache, .. }
            | Request::Set { cache, .. }
            | Request::Delete { cache, .. }
            | Request::DictionaryGetField { cache, .. }
            | Request::DictionaryGetFields { cache, .. }
            | Request::DictionarySetFields { cache, .. }
            | Request::ListConcatenateFront { cache, .. }
            | Request::ListRemoveValue { cache, .. } => cache,
        }
    }
}

/// Raw reply from a transport, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// One result code (single-key reads and write acknowledgements).
    Item(RawItem),
    /// One result code per requested field, in request order.
    Items(Vec<RawItem>),
    /// The addressed collection does not exist.
    Missing,
    /// Collection length after a write.
    Length(u64),
}

/// Performs one backend call.
///
/// Implementations report whole-call failures as `SdkError::Transport`;
/// per-item outcomes travel inside the `Reply`.
pub trait Transport: Send + Sync {
    fn call(&self, request: &Request) -> SdkResult<Reply>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn call(&self, request: &Request) -> SdkResult<Reply> {
        (**self).call(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, request: &Request) -> SdkResult<Reply> {
        (**self).call(request)
    }
}

/// RESP2 transport over a pooled TCP connection.
#[derive(Clone)]
pub struct RespTransport {
    pool: ConnectionPool,
}

impl RespTransport {
    pub fn new(config: PoolConfig) -> SdkResult<Self> {
        Ok(RespTransport {
            pool: ConnectionPool::new(config)?,
        })
    }

    /// Exposes the pool, mostly for inspection in tests.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn exec(&self, args: &[&[u8]]) -> SdkResult<RespValue> {
        let mut conn = self.pool.acquire()?;
        match conn.exec(args)? {
            RespValue::Error(message) => Err(server_error(&message)),
            value => Ok(value),
        }
    }
}

impl Transport for RespTransport {
    fn call(&self, request: &Request) -> SdkResult<Reply> {
        match request {
            Request::Get { cache, key } => {
                let key = namespaced(cache, key);
                match self.exec(&[b"GET", &key])? {
                    RespValue::Bulk(data) => Ok(Reply::Item(bulk_item(data))),
                    _ => Err(unexpected(request)),
                }
            }
            Request::Set {
                cache,
                key,
                value,
                ttl,
            } => {
                let key = namespaced(cache, key);
                let millis = ttl.as_millis().to_string();
                match self.exec(&[b"SET", &key, value, b"PX", millis.as_bytes()])? {
                    RespValue::Simple(_) => Ok(Reply::Item(RawItem::with_code(ResultCode::Ok))),
                    _ => Err(unexpected(request)),
                }
            }
            Request::Delete { cache, key } => {
                let key = namespaced(cache, key);
                match self.exec(&[b"DEL", &key])? {
                    RespValue::Integer(_) => Ok(Reply::Item(RawItem::with_code(ResultCode::Ok))),
                    _ => Err(unexpected(request)),
                }
            }
            Request::DictionaryGetField {
                cache,
                dictionary,
                field,
            } => {
                let key = namespaced(cache, dictionary);
                match self.exec(&[b"HGET", &key, field])? {
                    RespValue::Bulk(data) => Ok(Reply::Item(bulk_item(data))),
                    _ => Err(unexpected(request)),
                }
            }
            Request::DictionaryGetFields {
                cache,
                dictionary,
                fields,
            } => {
                let key = namespaced(cache, dictionary);
                let mut args: Vec<&[u8]> = Vec::with_capacity(fields.len() + 2);
                args.push(b"HMGET");
                args.push(&key);
                args.extend(fields.iter().map(|field| &field[..]));
                match self.exec(&args)? {
                    RespValue::Array(None) => Ok(Reply::Missing),
                    RespValue::Array(Some(values)) if values.len() == fields.len() => Ok(
                        Reply::Items(values.into_iter().map(element_item).collect()),
                    ),
                    RespValue::Array(Some(values)) => Err(SdkError::transport(
                        TransportKind::Protocol,
                        format!(
                            "HMGET returned {} values for {} fields",
                            values.len(),
                            fields.len()
                        ),
                    )),
                    _ => Err(unexpected(request)),
                }
            }
            Request::DictionarySetFields {
                cache,
                dictionary,
                fields,
            } => {
                let key = namespaced(cache, dictionary);
                let mut args: Vec<&[u8]> = Vec::with_capacity(fields.len() * 2 + 2);
                args.push(b"HSET");
                args.push(&key);
                for (field, value) in fields {
                    args.push(field);
                    args.push(value);
                }
                match self.exec(&args)? {
                    RespValue::Integer(_) => Ok(Reply::Item(RawItem::with_code(ResultCode::Ok))),
                    _ => Err(unexpected(request)),
                }
            }
            Request::ListConcatenateFront {
                cache,
                list,
                values,
            } => {
                let key = namespaced(cache, list);
                let mut args: Vec<&[u8]> = Vec::with_capacity(values.len() + 2);
                args.push(b"LPUSH");
                args.push(&key);
                // LPUSH prepends one at a time; reverse to keep caller order.
                args.extend(values.iter().rev().map(|value| &value[..]));
                match self.exec(&args)? {
                    RespValue::Integer(len) => u64::try_from(len)
                        .map(Reply::Length)
                        .map_err(|_| unexpected(request)),
                    _ => Err(unexpected(request)),
                }
            }
            Request::ListRemoveValue { cache, list, value } => {
                let key = namespaced(cache, list);
                match self.exec(&[b"LREM", &key, b"0", value])? {
                    RespValue::Integer(_) => Ok(Reply::Item(RawItem::with_code(ResultCode::Ok))),
                    _ => Err(unexpected(request)),
                }
            }
        }
    }
}

/// Builds the wire key `<cache>:<key>`.
fn namespaced(cache: &str, key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cache.len() + 1 + key.len());
    out.extend_from_slice(cache.as_bytes());
    out.push(b':');
    out.extend_from_slice(key);
    out
}

fn bulk_item(data: Option<Bytes>) -> RawItem {
    match data {
        Some(value) => RawItem::hit(value),
        None => RawItem::miss(),
    }
}

fn element_item(value: RespValue) -> RawItem {
    match value {
        RespValue::Bulk(data) => bulk_item(data),
        other => {
            warn!(reply = ?other, "non-bulk element in field reply");
            RawItem::with_code(ResultCode::Invalid)
        }
    }
}

fn server_error(message: &[u8]) -> SdkError {
    let text = String::from_utf8_lossy(message).into_owned();
    let kind = if text.starts_with("NOAUTH") || text.starts_with("WRONGPASS") {
        TransportKind::Authentication
    } else {
        TransportKind::Server
    };
    SdkError::transport(kind, text)
}

fn unexpected(request: &Request) -> SdkError {
    SdkError::transport(
        TransportKind::Protocol,
        format!("unexpected reply type for {}", request.name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_cache() {
        assert_eq!(namespaced("users", b"42"), b"users:42".to_vec());
        assert_eq!(namespaced("c", b""), b"c:".to_vec());
    }

    #[test]
    fn field_elements_map_to_codes() {
        assert_eq!(
            element_item(RespValue::Bulk(Some(Bytes::from_static(b"v")))),
            RawItem::hit("v")
        );
        assert_eq!(element_item(RespValue::Bulk(None)), RawItem::miss());
        assert_eq!(
            element_item(RespValue::Integer(1)),
            RawItem::with_code(ResultCode::Invalid)
        );
    }

    #[test]
    fn server_errors_are_classified() {
        assert_eq!(
            server_error(b"NOAUTH Authentication required.").transport_kind(),
            Some(TransportKind::Authentication)
        );
        assert_eq!(
            server_error(b"WRONGTYPE Operation against a key").transport_kind(),
            Some(TransportKind::Server)
        );
    }

    #[test]
    fn request_metadata() {
        let request = Request::ListRemoveValue {
            cache: "c".into(),
            list: Bytes::from_static(b"l"),
            value: Bytes::from_static(b"v"),
        };
        assert_eq!(request.name(), "list_remove_value");
        assert_eq!(request.cache(), "c");
    }
}
