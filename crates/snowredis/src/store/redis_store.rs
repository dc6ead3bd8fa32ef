use crate::{CoordinationStore, StoreError};
use core::time::Duration;
use parking_lot::Mutex;
use redis::{Client, Connection};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A [`CoordinationStore`] backed by a single Redis server.
///
/// - `set_if_absent` is `SET key value NX PX <ttl>`
/// - `increment` is `INCR key`
/// - `delete` is `DEL key...`
///
/// Commands share one synchronous connection behind a mutex. A broken
/// connection is not re-established; every later call reports the error.
pub struct RedisStore {
    conn: Mutex<Connection>,
}

impl RedisStore {
    /// Opens a connection to `url` (e.g. `redis://127.0.0.1:6379/0`) and
    /// verifies it with `PING`.
    ///
    /// `io_timeout` bounds every read and write on the connection; `None`
    /// blocks indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the URL is invalid or the server does
    /// not answer the `PING`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(url)))]
    pub fn connect(url: &str, io_timeout: Option<Duration>) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let mut conn = client.get_connection()?;
        conn.set_read_timeout(io_timeout)?;
        conn.set_write_timeout(io_timeout)?;

        let pong: String = redis::cmd("PING").query(&mut conn)?;
        if pong != "PONG" {
            return Err(StoreError::Protocol(format!(
                "expected PONG from server, got {pong:?}"
            )));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("connected to redis coordination store");

        Ok(Self::from_connection(conn))
    }

    /// Wraps an already established connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl CoordinationStore for RedisStore {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query(&mut *self.conn.lock())?;
        Ok(reply.is_some())
    }

    fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let value: i64 = redis::cmd("INCR").arg(key).query(&mut *self.conn.lock())?;
        Ok(value)
    }

    fn delete(&self, keys: &[&str]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: u64 = redis::cmd("DEL").arg(keys).query(&mut *self.conn.lock())?;
        Ok(removed)
    }
}
