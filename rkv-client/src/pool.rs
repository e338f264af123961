//! # Connection Pool
//!
//! Purpose: Reuse TCP connections for the RESP transport so each cache call
//! does not pay a handshake.
//!
//! ## Design Principles
//! 1. **Object Pool Pattern**: A bounded set of reusable connections.
//! 2. **Minimal Locking**: The mutex is held only while moving idle
//!    connections or adjusting the slot count.
//! 3. **Fail Fast**: Exceeding `max_total` returns `PoolExhausted` at once.
//! 4. **Poison on Failure**: A connection that saw an I/O or framing error
//!    is dropped rather than returned, since its stream position is unknown.

use std::collections::VecDeque;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::trace;

use rkv_common::{SdkError, SdkResult, TransportKind};

use crate::resp::{encode_command, read_reply, RespValue};

/// Pool settings, derived from `ClientConfig`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub addr: String,
    pub max_idle: usize,
    pub max_total: usize,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

struct PoolState {
    idle: VecDeque<Connection>,
    total: usize,
}

struct PoolInner {
    config: PoolConfig,
    addr: SocketAddr,
    state: Mutex<PoolState>,
}

impl PoolInner {
    fn state(&self) -> MutexGuard<'_, PoolState> {
        // Counters only; a panic elsewhere cannot leave them half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release_slot(&self) {
        let mut state = self.state();
        state.total = state.total.saturating_sub(1);
    }

    fn give_back(&self, conn: Connection) {
        let mut state = self.state();
        if state.idle.len() < self.config.max_idle {
            state.idle.push_back(conn);
        } else {
            state.total = state.total.saturating_sub(1);
        }
    }
}

/// Shared handle to a bounded set of RESP connections.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Creates an empty pool. Connections are opened lazily.
    pub fn new(config: PoolConfig) -> SdkResult<Self> {
        let addr: SocketAddr = config.addr.parse().map_err(|_| {
            SdkError::transport(
                TransportKind::InvalidAddress,
                format!("cannot parse socket address {:?}", config.addr),
            )
        })?;
        let state = PoolState {
            idle: VecDeque::with_capacity(config.max_idle),
            total: 0,
        };
        Ok(ConnectionPool {
            inner: Arc::new(PoolInner {
                config,
                addr,
                state: Mutex::new(state),
            }),
        })
    }

    /// Takes an idle connection, or opens one if a slot is free.
    pub fn acquire(&self) -> SdkResult<PooledConnection> {
        if let Some(conn) = self.inner.state().idle.pop_front() {
            trace!(addr = %self.inner.addr, "reusing idle connection");
            return Ok(PooledConnection::new(self.inner.clone(), conn));
        }

        if !self.try_reserve() {
            return Err(SdkError::transport(
                TransportKind::PoolExhausted,
                format!("all {} connections are in use", self.inner.config.max_total),
            ));
        }

        trace!(addr = %self.inner.addr, "opening new connection");
        match Connection::open(self.inner.addr, &self.inner.config) {
            Ok(conn) => Ok(PooledConnection::new(self.inner.clone(), conn)),
            Err(err) => {
                self.inner.release_slot();
                Err(err)
            }
        }
    }

    /// Number of idle connections currently held.
    pub fn idle_count(&self) -> usize {
        self.inner.state().idle.len()
    }

    fn try_reserve(&self) -> bool {
        let mut state = self.inner.state();
        if state.total >= self.inner.config.max_total {
            return false;
        }
        state.total += 1;
        true
    }
}

/// RAII guard returning its connection to the pool on drop.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    conn: Option<Connection>,
    healthy: bool,
}

impl PooledConnection {
    fn new(pool: Arc<PoolInner>, conn: Connection) -> Self {
        PooledConnection {
            pool,
            conn: Some(conn),
            healthy: true,
        }
    }

    /// Sends one command and reads its reply.
    pub fn exec(&mut self, args: &[&[u8]]) -> SdkResult<RespValue> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(SdkError::transport(
                TransportKind::Connection,
                "connection already released",
            ));
        };
        let reply = conn.exec(args);
        if reply.is_err() {
            self.healthy = false;
        }
        reply
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if self.healthy {
            trace!("returning connection to pool");
            self.pool.give_back(conn);
        } else {
            trace!("discarding failed connection");
            self.pool.release_slot();
        }
    }
}

/// One TCP connection with its own reusable buffers.
struct Connection {
    reader: BufReader<TcpStream>,
    line: Vec<u8>,
    out: Vec<u8>,
}

impl Connection {
    fn open(addr: SocketAddr, config: &PoolConfig) -> SdkResult<Self> {
        let stream = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        // Requests are small; Nagle would only add latency.
        stream.set_nodelay(true)?;

        Ok(Connection {
            reader: BufReader::new(stream),
            line: Vec::with_capacity(128),
            out: Vec::with_capacity(256),
        })
    }

    fn exec(&mut self, args: &[&[u8]]) -> SdkResult<RespValue> {
        self.out.clear();
        encode_command(args, &mut self.out);

        let stream = self.reader.get_mut();
        stream.write_all(&self.out)?;
        stream.flush()?;

        read_reply(&mut self.reader, &mut self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(addr: &str) -> PoolConfig {
        PoolConfig {
            addr: addr.to_string(),
            max_idle: 1,
            max_total: 1,
            read_timeout: None,
            write_timeout: None,
            connect_timeout: Some(Duration::from_millis(200)),
        }
    }

    #[test]
    fn rejects_unparseable_address() {
        let err = ConnectionPool::new(config("not-an-addr")).err().unwrap();
        assert_eq!(err.transport_kind(), Some(TransportKind::InvalidAddress));
    }

    #[test]
    fn failed_connect_releases_slot() {
        // Bind then drop to get a port that refuses connections.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let pool = ConnectionPool::new(config(&addr)).unwrap();

        for _ in 0..2 {
            let err = pool.acquire().err().unwrap();
            assert_ne!(err.transport_kind(), Some(TransportKind::PoolExhausted));
        }
        assert_eq!(pool.idle_count(), 0);
    }
}
