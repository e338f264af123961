//! # Cache Client API
//!
//! Purpose: Expose typed cache operations that always return a response
//! value: a hit, a miss, a success, or a classified error.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `CacheClient` hides validation, transport, and
//!    resolution behind one call per operation.
//! 2. **Validate First**: Bad arguments become `InvalidArgument` errors
//!    before the transport is touched.
//! 3. **Errors as Values**: Methods never return `Result`; call
//!    `into_result()` on a response to opt into `?`.
//! 4. **Pluggable Transport**: Generic over `Transport`, defaulting to the
//!    pooled RESP transport.

use bytes::Bytes;
use tracing::{debug, warn};

use rkv_common::{IntoBytesArg, IntoTextArg, RawItem, SdkError, SdkResult, TransportKind, Ttl};

use crate::config::ClientConfig;
use crate::resolver::{resolve_ack, resolve_batch, resolve_item, Outcome, Resolved};
use crate::response::{
    DeleteResponse, DictionaryGetFieldResponse, DictionaryGetFieldsHit,
    DictionaryGetFieldsResponse, DictionarySetFieldsResponse, GetResponse,
    ListConcatenateFrontResponse, ListRemoveValueResponse, Render, SetResponse, SetSuccess,
};
use crate::transport::{Reply, Request, RespTransport, Transport};
use crate::validation;

/// Client for a remote cache.
///
/// Every call validates its arguments, performs exactly one transport call,
/// and resolves the reply into the operation's response type. The client
/// holds no mutable state and can be shared across threads behind an `Arc`.
pub struct CacheClient<T = RespTransport> {
    transport: T,
    default_ttl: Ttl,
}

impl CacheClient<RespTransport> {
    /// Creates a RESP client for `addr` with default settings.
    pub fn connect(addr: impl Into<String>) -> SdkResult<Self> {
        let config = ClientConfig {
            addr: addr.into(),
            ..ClientConfig::default()
        };
        Self::with_config(config)
    }

    /// Creates a RESP client from a full configuration.
    pub fn with_config(config: ClientConfig) -> SdkResult<Self> {
        let transport = RespTransport::new(config.pool_config())?;
        Ok(CacheClient {
            transport,
            default_ttl: config.default_ttl(),
        })
    }
}

impl<T: Transport> CacheClient<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(transport: T, default_ttl: Ttl) -> Self {
        CacheClient {
            transport,
            default_ttl,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// TTL used by `set` when none is given.
    pub fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    /// Fetches the value stored under `key`.
    pub fn get(&self, cache: impl IntoTextArg, key: impl IntoBytesArg) -> GetResponse {
        let response = self
            .try_get(cache.into_text_arg(), key.into_bytes_arg())
            .unwrap_or_else(GetResponse::Error);
        finish("get", response)
    }

    /// Stores `value` under `key`. `None` for `ttl` uses the client default.
    pub fn set(
        &self,
        cache: impl IntoTextArg,
        key: impl IntoBytesArg,
        value: impl IntoBytesArg,
        ttl: impl Into<Option<Ttl>>,
    ) -> SetResponse {
        let response = self
            .try_set(
                cache.into_text_arg(),
                key.into_bytes_arg(),
                value.into_bytes_arg(),
                ttl.into(),
            )
            .unwrap_or_else(SetResponse::Error);
        finish("set", response)
    }

    /// Removes `key`. Succeeds whether or not the key existed.
    pub fn delete(&self, cache: impl IntoTextArg, key: impl IntoBytesArg) -> DeleteResponse {
        let response = self
            .try_delete(cache.into_text_arg(), key.into_bytes_arg())
            .unwrap_or_else(DeleteResponse::Error);
        finish("delete", response)
    }

    /// Fetches one field of a dictionary.
    pub fn dictionary_get_field(
        &self,
        cache: impl IntoTextArg,
        dictionary: impl IntoBytesArg,
        field: impl IntoBytesArg,
    ) -> DictionaryGetFieldResponse {
        let field = field.into_bytes_arg();
        let response = self
            .try_dictionary_get_field(
                cache.into_text_arg(),
                dictionary.into_bytes_arg(),
                field.clone(),
            )
            .unwrap_or_else(|error| DictionaryGetFieldResponse::Error {
                field: field.unwrap_or_default(),
                error,
            });
        finish("dictionary_get_field", response)
    }

    /// Fetches many fields of a dictionary in one call.
    ///
    /// The hit keeps one result per requested field, in request order.
    pub fn dictionary_get_fields<I>(
        &self,
        cache: impl IntoTextArg,
        dictionary: impl IntoBytesArg,
        fields: I,
    ) -> DictionaryGetFieldsResponse
    where
        I: IntoIterator,
        I::Item: IntoBytesArg,
    {
        let fields = fields
            .into_iter()
            .map(IntoBytesArg::into_bytes_arg)
            .collect();
        let response = self
            .try_dictionary_get_fields(cache.into_text_arg(), dictionary.into_bytes_arg(), fields)
            .unwrap_or_else(DictionaryGetFieldsResponse::Error);
        finish("dictionary_get_fields", response)
    }

    /// Sets one field of a dictionary, creating the dictionary if needed.
    pub fn dictionary_set_field(
        &self,
        cache: impl IntoTextArg,
        dictionary: impl IntoBytesArg,
        field: impl IntoBytesArg,
        value: impl IntoBytesArg,
    ) -> DictionarySetFieldsResponse {
        self.dictionary_set_fields(cache, dictionary, [(field, value)])
    }

    /// Sets many fields of a dictionary in one call.
    pub fn dictionary_set_fields<I, F, V>(
        &self,
        cache: impl IntoTextArg,
        dictionary: impl IntoBytesArg,
        fields: I,
    ) -> DictionarySetFieldsResponse
    where
        I: IntoIterator<Item = (F, V)>,
        F: IntoBytesArg,
        V: IntoBytesArg,
    {
        let fields = fields
            .into_iter()
            .map(|(field, value)| (field.into_bytes_arg(), value.into_bytes_arg()))
            .collect();
        let response = self
            .try_dictionary_set_fields(cache.into_text_arg(), dictionary.into_bytes_arg(), fields)
            .unwrap_or_else(DictionarySetFieldsResponse::Error);
        finish("dictionary_set_fields", response)
    }

    /// Prepends `values` to a list, keeping their order: after the call the
    /// list starts with `values[0]`.
    pub fn list_concatenate_front<I>(
        &self,
        cache: impl IntoTextArg,
        list: impl IntoBytesArg,
        values: I,
    ) -> ListConcatenateFrontResponse
    where
        I: IntoIterator,
        I::Item: IntoBytesArg,
    {
        let values = values
            .into_iter()
            .map(IntoBytesArg::into_bytes_arg)
            .collect();
        let response = self
            .try_list_concatenate_front(cache.into_text_arg(), list.into_bytes_arg(), values)
            .unwrap_or_else(ListConcatenateFrontResponse::Error);
        finish("list_concatenate_front", response)
    }

    /// Removes every occurrence of `value` from a list.
    pub fn list_remove_value(
        &self,
        cache: impl IntoTextArg,
        list: impl IntoBytesArg,
        value: impl IntoBytesArg,
    ) -> ListRemoveValueResponse {
        let response = self
            .try_list_remove_value(
                cache.into_text_arg(),
                list.into_bytes_arg(),
                value.into_bytes_arg(),
            )
            .unwrap_or_else(ListRemoveValueResponse::Error);
        finish("list_remove_value", response)
    }

    fn try_get(&self, cache: Option<String>, key: Option<Bytes>) -> SdkResult<GetResponse> {
        let request = Request::Get {
            cache: validation::cache_name(cache)?,
            key: validation::required(key, "Key")?,
        };
        match self.call(&request)? {
            Reply::Item(raw) => Ok(GetResponse::from_outcome(item(&request, raw))),
            Reply::Missing => Ok(GetResponse::Miss),
            _ => Err(mismatch(&request)),
        }
    }

    fn try_set(
        &self,
        cache: Option<String>,
        key: Option<Bytes>,
        value: Option<Bytes>,
        ttl: Option<Ttl>,
    ) -> SdkResult<SetResponse> {
        let cache = validation::cache_name(cache)?;
        let key = validation::required(key, "Key")?;
        let value = validation::required(value, "Value")?;
        let ttl = validation::ttl(ttl.unwrap_or(self.default_ttl))?;

        let request = Request::Set {
            cache,
            key,
            value: value.clone(),
            ttl,
        };
        match self.call(&request)? {
            Reply::Item(raw) => {
                ack(&request, &raw)?;
                Ok(SetResponse::Success(SetSuccess::new(value)))
            }
            _ => Err(mismatch(&request)),
        }
    }

    fn try_delete(&self, cache: Option<String>, key: Option<Bytes>) -> SdkResult<DeleteResponse> {
        let request = Request::Delete {
            cache: validation::cache_name(cache)?,
            key: validation::required(key, "Key")?,
        };
        match self.call(&request)? {
            Reply::Item(raw) => {
                ack(&request, &raw)?;
                Ok(DeleteResponse::Success)
            }
            _ => Err(mismatch(&request)),
        }
    }

    fn try_dictionary_get_field(
        &self,
        cache: Option<String>,
        dictionary: Option<Bytes>,
        field: Option<Bytes>,
    ) -> SdkResult<DictionaryGetFieldResponse> {
        let cache = validation::cache_name(cache)?;
        let dictionary = validation::required(dictionary, "Dictionary name")?;
        let field = validation::required(field, "Field")?;

        let request = Request::DictionaryGetField {
            cache,
            dictionary,
            field: field.clone(),
        };
        match self.call(&request)? {
            Reply::Item(raw) => Ok(DictionaryGetFieldResponse::from_resolved(Resolved {
                key: field,
                outcome: item(&request, raw),
            })),
            Reply::Missing => Ok(DictionaryGetFieldResponse::Miss { field }),
            _ => Err(mismatch(&request)),
        }
    }

    fn try_dictionary_get_fields(
        &self,
        cache: Option<String>,
        dictionary: Option<Bytes>,
        fields: Vec<Option<Bytes>>,
    ) -> SdkResult<DictionaryGetFieldsResponse> {
        let cache = validation::cache_name(cache)?;
        let dictionary = validation::required(dictionary, "Dictionary name")?;
        let fields = validation::required_all(fields, "Fields")?;

        let request = Request::DictionaryGetFields {
            cache,
            dictionary,
            fields: fields.clone(),
        };
        match self.call(&request)? {
            Reply::Items(raws) => Ok(DictionaryGetFieldsResponse::Hit(
                DictionaryGetFieldsHit::from_resolved(batch(&request, fields, raws)),
            )),
            Reply::Missing => Ok(DictionaryGetFieldsResponse::Miss),
            _ => Err(mismatch(&request)),
        }
    }

    fn try_dictionary_set_fields(
        &self,
        cache: Option<String>,
        dictionary: Option<Bytes>,
        fields: Vec<(Option<Bytes>, Option<Bytes>)>,
    ) -> SdkResult<DictionarySetFieldsResponse> {
        let cache = validation::cache_name(cache)?;
        let dictionary = validation::required(dictionary, "Dictionary name")?;
        if fields.is_empty() {
            return Err(SdkError::invalid_argument("Fields must not be empty"));
        }
        let fields = fields
            .into_iter()
            .map(|(field, value)| {
                Ok((
                    validation::required(field, "Field")?,
                    validation::required(value, "Value")?,
                ))
            })
            .collect::<SdkResult<Vec<_>>>()?;

        let request = Request::DictionarySetFields {
            cache,
            dictionary,
            fields,
        };
        match self.call(&request)? {
            Reply::Item(raw) => {
                ack(&request, &raw)?;
                Ok(DictionarySetFieldsResponse::Success)
            }
            _ => Err(mismatch(&request)),
        }
    }

    fn try_list_concatenate_front(
        &self,
        cache: Option<String>,
        list: Option<Bytes>,
        values: Vec<Option<Bytes>>,
    ) -> SdkResult<ListConcatenateFrontResponse> {
        let request = Request::ListConcatenateFront {
            cache: validation::cache_name(cache)?,
            list: validation::required(list, "List name")?,
            values: validation::required_all(values, "Values")?,
        };
        match self.call(&request)? {
            Reply::Length(list_length) => {
                Ok(ListConcatenateFrontResponse::Success { list_length })
            }
            _ => Err(mismatch(&request)),
        }
    }

    fn try_list_remove_value(
        &self,
        cache: Option<String>,
        list: Option<Bytes>,
        value: Option<Bytes>,
    ) -> SdkResult<ListRemoveValueResponse> {
        let request = Request::ListRemoveValue {
            cache: validation::cache_name(cache)?,
            list: validation::required(list, "List name")?,
            value: validation::required(value, "Value")?,
        };
        match self.call(&request)? {
            Reply::Item(raw) => {
                ack(&request, &raw)?;
                Ok(ListRemoveValueResponse::Success)
            }
            Reply::Missing => Ok(ListRemoveValueResponse::Success),
            _ => Err(mismatch(&request)),
        }
    }

    fn call(&self, request: &Request) -> SdkResult<Reply> {
        self.transport.call(request).map_err(|err| {
            warn!(
                op = request.name(),
                cache = request.cache(),
                error = %err,
                "cache call failed"
            );
            err
        })
    }
}

fn finish<R: Render>(op: &'static str, response: R) -> R {
    debug!(op, response = %response.render(), "cache call completed");
    response
}

fn item(request: &Request, raw: RawItem) -> Outcome {
    let outcome = resolve_item(raw);
    if let Outcome::Error(err) = &outcome {
        warn!(op = request.name(), error = %err, "unexpected per-item result code");
    }
    outcome
}

fn batch(request: &Request, keys: Vec<Bytes>, raws: Vec<RawItem>) -> Vec<Resolved> {
    let resolved = resolve_batch(keys, raws);
    let errors = resolved
        .iter()
        .filter(|item| matches!(item.outcome, Outcome::Error(_)))
        .count();
    if errors > 0 {
        warn!(op = request.name(), errors, "unexpected per-field result codes");
    }
    resolved
}

fn ack(request: &Request, raw: &RawItem) -> SdkResult<()> {
    resolve_ack(raw).map_err(|err| {
        warn!(op = request.name(), error = %err, "unexpected acknowledgement code");
        err
    })
}

fn mismatch(request: &Request) -> SdkError {
    SdkError::transport(
        TransportKind::Protocol,
        format!("transport returned the wrong reply shape for {}", request.name()),
    )
}
