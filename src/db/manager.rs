//! The database handle handed to the rest of the program.
//!
//! One `Database` is constructed at startup and passed to whoever needs it
//! (behind an `Arc` when shared across threads). It owns the lifecycle
//! Uninitialized → Connected → Closed; Closed is terminal.

use crate::db::fields::FieldMap;
use crate::db::pool::{DbPool, PooledConnection};
use crate::db::queries;
use crate::db::row::ResultSet;
use crate::db::session::ConnectOptions;
use crate::db::statement::{build_insert, build_update};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connected,
    Closed,
}

enum State {
    Uninitialized,
    Connected(Arc<DbPool>),
    Closed,
}

/// Outcome of an insert or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub affected_rows: usize,
    /// Rowid of the inserted row; `None` for updates and `WITHOUT ROWID`
    /// tables.
    pub last_insert_id: Option<i64>,
}

/// Session settings as reported by the database itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub path: String,
    pub charset: String,
    pub time_zone: String,
    pub now: String,
}

pub struct Database {
    options: ConnectOptions,
    state: Mutex<State>,
}

impl Database {
    /// Lazy handle: nothing is opened until first use.
    pub fn new(options: ConnectOptions) -> Self {
        Self {
            options,
            state: Mutex::new(State::Uninitialized),
        }
    }

    /// Open the database now and fail with `AppError::Connection` if it
    /// cannot be reached.
    pub fn connect(options: ConnectOptions) -> AppResult<Self> {
        let db = Self::new(options);
        db.instance()?;
        Ok(db)
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::Connection("database state lock poisoned".into()))
    }

    pub fn state(&self) -> ConnectionState {
        match self.lock().as_deref() {
            Ok(State::Uninitialized) => ConnectionState::Uninitialized,
            Ok(State::Connected(_)) => ConnectionState::Connected,
            Ok(State::Closed) | Err(_) => ConnectionState::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// The pool behind this handle, opened on first call. Every later call
    /// returns the same pool until `close()`.
    pub fn instance(&self) -> AppResult<Arc<DbPool>> {
        let mut state = self.lock()?;

        if let State::Connected(pool) = &*state {
            return Ok(Arc::clone(pool));
        }
        if matches!(*state, State::Closed) {
            return Err(AppError::Connection("database handle is closed".into()));
        }

        let pool = DbPool::new(self.options.clone())?;
        *state = State::Connected(Arc::clone(&pool));
        Ok(pool)
    }

    /// Raw driver connection, checked out for the caller's exclusive use.
    ///
    /// While held, it counts against the pool: when the calling thread holds
    /// every connection (always the case for `:memory:` or `pool_size = 1`),
    /// other operations from that thread fail with `AppError::Connection`
    /// until it is dropped.
    pub fn connection(&self) -> AppResult<PooledConnection> {
        self.instance()?.get()
    }

    /// Run raw SQL and return every row.
    pub fn query(&self, sql: &str) -> AppResult<ResultSet> {
        queries::require_sql(sql)?;
        let conn = self.connection()?;
        queries::fetch_all(&conn, sql)
    }

    /// Insert one row built from `fields`, in their order.
    pub fn insert(&self, table: &str, fields: &FieldMap) -> AppResult<WriteResult> {
        let stmt = build_insert(table, fields)?;
        let conn = self.connection()?;

        let affected_rows = queries::execute(&conn, &stmt)?;

        // The connection keeps the rowid of its last rowid-table insert, so
        // only trust it when this insert produced one.
        let last_insert_id = if affected_rows > 0 && !queries::is_without_rowid(&conn, table)? {
            Some(conn.last_insert_rowid())
        } else {
            None
        };

        Ok(WriteResult {
            affected_rows,
            last_insert_id,
        })
    }

    /// Update rows matching `where_clause`, a raw SQL predicate used as given.
    pub fn update(
        &self,
        table: &str,
        fields: &FieldMap,
        where_clause: &str,
    ) -> AppResult<WriteResult> {
        let stmt = build_update(table, fields, where_clause)?;
        let conn = self.connection()?;

        let affected_rows = queries::execute(&conn, &stmt)?;
        Ok(WriteResult {
            affected_rows,
            last_insert_id: None,
        })
    }

    pub fn execute_batch(&self, sql: &str) -> AppResult<()> {
        queries::require_sql(sql)?;
        let conn = self.connection()?;
        queries::execute_script(&conn, sql)
    }

    pub fn ping(&self) -> AppResult<()> {
        let conn = self.connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|e| AppError::Connection(format!("ping failed: {e}")))
    }

    pub fn session_info(&self) -> AppResult<SessionInfo> {
        let conn = self.connection()?;
        let (charset, time_zone, now) = queries::session_info(&conn)?;

        Ok(SessionInfo {
            path: self.options.path.clone(),
            charset,
            time_zone,
            now,
        })
    }

    /// Release the database. Safe to call more than once; afterwards every
    /// operation fails with `AppError::Connection`.
    pub fn close(&self) {
        let previous = match self.lock() {
            Ok(mut state) => std::mem::replace(&mut *state, State::Closed),
            Err(_) => return,
        };

        if let State::Connected(pool) = previous {
            pool.close();
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
