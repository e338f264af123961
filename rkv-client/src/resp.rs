//! # RESP2 Framing
//!
//! Purpose: Encode commands and decode replies for the RESP transport.
//!
//! ## Design Principles
//! 1. **Top-Down Parsing**: One reply is read recursively from a buffered
//!    reader; no parser state survives between replies.
//! 2. **Buffer Reuse**: The caller owns the line and output buffers.
//! 3. **Binary-Safe**: Bulk strings are raw bytes, handed out as `Bytes`.
//! 4. **Fail Fast**: Bad framing is a `Protocol` transport error; the
//!    connection is then discarded by the pool.
//! 5. **Bounded Input**: Declared lengths and nesting are capped, and memory
//!    grows with bytes received rather than with what the server announces.

use std::io::{self, BufRead, Read};

use bytes::Bytes;

use rkv_common::{SdkError, SdkResult, TransportKind};

/// Largest bulk string accepted from the server (512 MiB, the Redis limit).
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Largest array length accepted from the server.
pub const MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Deepest array nesting accepted from the server.
pub const MAX_DEPTH: usize = 8;

/// Upper bound on memory reserved ahead of data actually received.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// One decoded RESP2 reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// +OK style status line.
    Simple(Vec<u8>),
    /// -ERR style error line.
    Error(Vec<u8>),
    Integer(i64),
    /// Bulk string; `None` is the null bulk.
    Bulk(Option<Bytes>),
    /// Array; `None` is the null array.
    Array(Option<Vec<RespValue>>),
}

fn protocol(message: &str) -> SdkError {
    SdkError::transport(TransportKind::Protocol, message)
}

/// Appends `args` as a RESP2 array of bulk strings.
pub fn encode_command(args: &[&[u8]], out: &mut Vec<u8>) {
    push_header(out, b'*', args.len());
    for arg in args {
        push_header(out, b'$', arg.len());
        out.extend_from_slice(arg);
        out.extend_from_slice(b"\r\n");
    }
}

fn push_header(out: &mut Vec<u8>, marker: u8, len: usize) {
    out.push(marker);
    push_usize(out, len);
    out.extend_from_slice(b"\r\n");
}

fn push_usize(out: &mut Vec<u8>, mut value: usize) {
    // Digits are produced last-first into a stack buffer.
    let mut digits = [0u8; 20];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[start..]);
}

/// Reads one reply from `reader`.
pub fn read_reply<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> SdkResult<RespValue> {
    read_value(reader, line, 0)
}

fn read_value<R: BufRead>(reader: &mut R, line: &mut Vec<u8>, depth: usize) -> SdkResult<RespValue> {
    read_line(reader, line)?;
    let (&marker, rest) = line
        .split_first()
        .ok_or_else(|| protocol("empty reply line"))?;

    match marker {
        b'+' => Ok(RespValue::Simple(rest.to_vec())),
        b'-' => Ok(RespValue::Error(rest.to_vec())),
        b':' => Ok(RespValue::Integer(parse_int(rest)?)),
        b'$' => {
            let len = parse_int(rest)?;
            read_bulk(reader, len)
        }
        b'*' => {
            let len = parse_int(rest)?;
            read_array(reader, len, line, depth)
        }
        _ => Err(protocol("unknown reply marker")),
    }
}

fn read_bulk<R: BufRead>(reader: &mut R, len: i64) -> SdkResult<RespValue> {
    if len < 0 {
        return Ok(RespValue::Bulk(None));
    }
    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len <= MAX_BULK_LEN)
        .ok_or_else(|| protocol("bulk string too large"))?;

    // Grow with the bytes that arrive instead of trusting the declared size.
    let mut data = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    if data.len() != len {
        return Err(protocol("bulk string shorter than declared length"));
    }

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => protocol("bulk string missing CRLF"),
        _ => err.into(),
    })?;
    if &crlf != b"\r\n" {
        return Err(protocol("bulk string missing CRLF"));
    }
    Ok(RespValue::Bulk(Some(Bytes::from(data))))
}

fn read_array<R: BufRead>(
    reader: &mut R,
    len: i64,
    line: &mut Vec<u8>,
    depth: usize,
) -> SdkResult<RespValue> {
    if len < 0 {
        return Ok(RespValue::Array(None));
    }
    if depth >= MAX_DEPTH {
        return Err(protocol("array nesting too deep"));
    }
    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len <= MAX_ARRAY_LEN)
        .ok_or_else(|| protocol("array too large"))?;

    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT / std::mem::size_of::<RespValue>()));
    for _ in 0..len {
        items.push(read_value(reader, line, depth + 1)?);
    }
    Ok(RespValue::Array(Some(items)))
}

fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> SdkResult<()> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Err(SdkError::transport(
            TransportKind::Connection,
            "connection closed by server",
        ));
    }
    if !buf.ends_with(b"\r\n") {
        return Err(protocol("reply line missing CRLF"));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_int(data: &[u8]) -> SdkResult<i64> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| protocol("invalid integer in reply"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &[u8]) -> SdkResult<RespValue> {
        let mut reader = Cursor::new(input.to_vec());
        let mut line = Vec::new();
        read_reply(&mut reader, &mut line)
    }

    #[test]
    fn encodes_command() {
        let mut buf = Vec::new();
        encode_command(&[b"HMGET", b"c:dict", b""], &mut buf);
        assert_eq!(&buf, b"*3\r\n$5\r\nHMGET\r\n$6\r\nc:dict\r\n$0\r\n\r\n");
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(parse(b"+OK\r\n").unwrap(), RespValue::Simple(b"OK".to_vec()));
        assert_eq!(parse(b":-3\r\n").unwrap(), RespValue::Integer(-3));
        assert_eq!(
            parse(b"-WRONGTYPE nope\r\n").unwrap(),
            RespValue::Error(b"WRONGTYPE nope".to_vec())
        );
    }

    #[test]
    fn parses_bulk_and_null_bulk() {
        assert_eq!(
            parse(b"$5\r\nhe\r\no\r\n").unwrap(),
            RespValue::Bulk(Some(Bytes::from_static(b"he\r\no")))
        );
        assert_eq!(parse(b"$-1\r\n").unwrap(), RespValue::Bulk(None));
    }

    #[test]
    fn parses_mixed_array() {
        let value = parse(b"*3\r\n$1\r\n1\r\n$-1\r\n$1\r\n3\r\n").unwrap();
        assert_eq!(
            value,
            RespValue::Array(Some(vec![
                RespValue::Bulk(Some(Bytes::from_static(b"1"))),
                RespValue::Bulk(None),
                RespValue::Bulk(Some(Bytes::from_static(b"3"))),
            ]))
        );
        assert_eq!(parse(b"*-1\r\n").unwrap(), RespValue::Array(None));
        assert_eq!(parse(b"*0\r\n").unwrap(), RespValue::Array(Some(Vec::new())));
    }

    #[test]
    fn rejects_bad_framing() {
        for input in [&b"?x\r\n"[..], b"+OK\n", b":abc\r\n", b"$3\r\nabcXY"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.transport_kind(), Some(TransportKind::Protocol), "{:?}", input);
        }
    }

    #[test]
    fn encodes_multi_digit_lengths() {
        let arg = vec![b'x'; 1234];
        let mut buf = Vec::new();
        encode_command(&[b"GET", &arg], &mut buf);
        assert!(buf.starts_with(b"*2\r\n$3\r\nGET\r\n$1234\r\nxxx"));
        assert_eq!(buf.len(), 4 + 9 + 7 + 1234 + 2);
    }

    #[test]
    fn rejects_oversized_lengths() {
        for input in [
            &b"*9223372036854775807\r\n"[..],
            b"$9223372036854775000\r\n",
            b"*1048577\r\n",
            b"$536870913\r\n",
        ] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.transport_kind(), Some(TransportKind::Protocol), "{:?}", input);
        }
    }

    #[test]
    fn rejects_deep_nesting() {
        let mut input = b"*1\r\n".repeat(MAX_DEPTH + 1);
        input.extend_from_slice(b":1\r\n");
        let err = parse(&input).unwrap_err();
        assert_eq!(err.transport_kind(), Some(TransportKind::Protocol));

        let mut input = b"*1\r\n".repeat(MAX_DEPTH);
        input.extend_from_slice(b":1\r\n");
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn rejects_truncated_bulk() {
        for input in [&b"$5\r\nab"[..], b"$2\r\nab", b"$2\r\nab\r"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.transport_kind(), Some(TransportKind::Protocol), "{:?}", input);
        }
    }

    #[test]
    fn truncated_array_is_an_error() {
        let err = parse(b"*3\r\n$1\r\n1\r\n").unwrap_err();
        assert_eq!(err.transport_kind(), Some(TransportKind::Connection));
    }

    #[test]
    fn eof_is_a_connection_error() {
        let err = parse(b"").unwrap_err();
        assert_eq!(err.transport_kind(), Some(TransportKind::Connection));
    }
}
