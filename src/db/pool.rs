//! SQLite connection pool.
//!
//! Each operation checks a connection out of an `r2d2` pool, uses it
//! exclusively and hands it back when the guard drops. Connections are opened
//! on demand up to the configured size; when all of them are busy, `get()`
//! waits. The one exception: a thread that already holds every connection
//! gets `AppError::Connection` instead of waiting on itself.

use crate::db::session::ConnectOptions;
use crate::errors::{AppError, AppResult};
use r2d2::{HandleError, ManageConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// How long a checkout may wait for a busy pool. Long enough to never fire
/// in practice; `r2d2` needs a finite deadline.
const CHECKOUT_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

type Holders = Arc<Mutex<HashMap<ThreadId, u32>>>;

/// Routes connection errors raised inside `r2d2` to `tracing`.
#[derive(Debug)]
struct TracingErrorHandler;

impl HandleError<rusqlite::Error> for TracingErrorHandler {
    fn handle_error(&self, error: rusqlite::Error) {
        tracing::warn!(error = %error, "pooled connection failed");
    }
}

pub struct DbPool {
    options: ConnectOptions,
    max_size: u32,
    pool: RwLock<Option<Pool<SqliteConnectionManager>>>,
    holders: Holders,
}

impl DbPool {
    /// Create the pool after opening one connection, so that a bad location
    /// or a broken session setup surfaces here.
    pub fn new(options: ConnectOptions) -> AppResult<Arc<Self>> {
        let manager = options.manager();

        // `r2d2` retries failed connects until the checkout deadline, so
        // probe once by hand.
        let first = manager.connect().map_err(|e| options.connect_error(e))?;
        drop(first);

        let max_size = u32::try_from(options.effective_pool_size()).unwrap_or(u32::MAX);

        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(0))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(CHECKOUT_WAIT)
            .error_handler(Box::new(TracingErrorHandler))
            .build_unchecked(manager);

        tracing::info!(path = %options.path, max_size, "database pool ready");

        Ok(Arc::new(Self {
            options,
            max_size,
            pool: RwLock::new(Some(pool)),
            holders: Arc::default(),
        }))
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    pub fn max_size(&self) -> usize {
        self.max_size as usize
    }

    /// Number of connections waiting in the pool.
    pub fn idle_count(&self) -> usize {
        self.pool()
            .map(|p| p.state().idle_connections as usize)
            .unwrap_or(0)
    }

    /// Number of connections alive, idle or checked out.
    pub fn open_count(&self) -> usize {
        self.pool()
            .map(|p| p.state().connections as usize)
            .unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.pool().is_err()
    }

    fn pool(&self) -> AppResult<Pool<SqliteConnectionManager>> {
        let guard = self
            .pool
            .read()
            .map_err(|_| AppError::Connection("connection pool lock poisoned".into()))?;

        guard
            .clone()
            .ok_or_else(|| AppError::Connection("connection pool is closed".into()))
    }

    fn held_by(&self, id: ThreadId) -> u32 {
        self.holders
            .lock()
            .map(|h| h.get(&id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Check a connection out, blocking until one is free.
    ///
    /// Fails with `AppError::Connection` when the calling thread already
    /// holds every connection of the pool, since nobody else could free one.
    pub fn get(&self) -> AppResult<PooledConnection> {
        let pool = self.pool()?;
        let me = thread::current().id();

        let conn = match pool.try_get() {
            Some(conn) => conn,
            None => {
                if self.held_by(me) >= self.max_size {
                    return Err(AppError::Connection(
                        "connection already checked out by this thread".into(),
                    ));
                }
                pool.get()
                    .map_err(|e| AppError::Connection(format!("cannot check out a connection: {e}")))?
            }
        };

        Ok(PooledConnection::new(conn, me, Arc::clone(&self.holders)))
    }

    /// Helper to execute a closure with a checked-out connection.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.get()?;
        func(&mut conn)
    }

    /// Drop the pool and refuse further checkouts. Idle connections close
    /// now; connections still checked out close when returned. Calling it
    /// again does nothing.
    pub fn close(&self) {
        let Ok(mut guard) = self.pool.write() else {
            return;
        };

        if guard.take().is_some() {
            tracing::info!(path = %self.options.path, "database pool closed");
        }
    }
}

/// A checked-out connection; returns to its pool on drop.
pub struct PooledConnection {
    conn: r2d2::PooledConnection<SqliteConnectionManager>,
    owner: ThreadId,
    holders: Holders,
}

impl PooledConnection {
    fn new(
        conn: r2d2::PooledConnection<SqliteConnectionManager>,
        owner: ThreadId,
        holders: Holders,
    ) -> Self {
        if let Ok(mut h) = holders.lock() {
            *h.entry(owner).or_insert(0) += 1;
        }

        Self {
            conn,
            owner,
            holders,
        }
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Ok(mut h) = self.holders.lock()
            && let Some(n) = h.get_mut(&self.owner)
        {
            *n -= 1;
            if *n == 0 {
                h.remove(&self.owner);
            }
        }
    }
}
