//! Connection options and per-connection session setup.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::sync::OnceLock;

pub const MEMORY_DATABASE: &str = ":memory:";
pub const DEFAULT_POOL_SIZE: usize = 4;
pub const DEFAULT_TIME_ZONE: &str = "+08:00";

/// Session settings applied once to every new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Offset used by the `now()` session function.
    pub utc_offset: FixedOffset,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap_or_else(utc),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl SessionSettings {
    pub fn with_time_zone(tz: &str) -> AppResult<Self> {
        Ok(Self {
            utc_offset: parse_utc_offset(tz)?,
        })
    }

    /// Session offset as `+HH:MM`.
    pub fn time_zone(&self) -> String {
        format_offset(self.utc_offset)
    }

    /// Set the session charset and register the session functions.
    pub fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        // Only effective on a freshly created file; SQLite hands text back as
        // UTF-8 through rusqlite whatever the stored encoding is.
        conn.execute_batch("PRAGMA encoding = 'UTF-8';")?;

        let offset = self.utc_offset;
        conn.create_scalar_function("now", 0, FunctionFlags::SQLITE_UTF8, move |_| {
            Ok(Utc::now()
                .with_timezone(&offset)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string())
        })?;

        let label = self.time_zone();
        conn.create_scalar_function(
            "session_time_zone",
            0,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            move |_| Ok(label.clone()),
        )?;

        Ok(())
    }
}

/// Parse `+8:00`, `-05:30`, `+08:00`, `UTC` or `Z` into a fixed offset.
pub fn parse_utc_offset(input: &str) -> AppResult<FixedOffset> {
    static RE: OnceLock<Regex> = OnceLock::new();

    let s = input.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return Ok(utc());
    }

    let re = RE.get_or_init(|| {
        Regex::new(r"^([+-])(\d{1,2}):(\d{2})$").expect("static time zone pattern")
    });

    let caps = re
        .captures(s)
        .ok_or_else(|| AppError::Config(format!("Invalid time zone: {input}")))?;

    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid time zone: {input}")))?;
    let minutes: i32 = caps[3]
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid time zone: {input}")))?;

    if hours > 14 || minutes > 59 {
        return Err(AppError::Config(format!("Time zone out of range: {input}")));
    }

    let mut secs = hours * 3600 + minutes * 60;
    if &caps[1] == "-" {
        secs = -secs;
    }

    FixedOffset::east_opt(secs)
        .ok_or_else(|| AppError::Config(format!("Time zone out of range: {input}")))
}

fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

/// Map a configured charset name onto the single supported session charset.
pub fn normalize_charset(input: &str) -> AppResult<&'static str> {
    match input.trim().to_ascii_lowercase().as_str() {
        "utf8" | "utf-8" | "utf8mb4" => Ok("UTF-8"),
        other => Err(AppError::Config(format!("Unsupported charset: {other}"))),
    }
}

/// Everything needed to open a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOptions {
    /// File path, `file:` URI or `:memory:`.
    pub path: String,
    /// Create the database file when it does not exist.
    pub create_if_missing: bool,
    pub pool_size: usize,
    pub session: SessionSettings,
}

impl ConnectOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: false,
            pool_size: DEFAULT_POOL_SIZE,
            session: SessionSettings::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_DATABASE)
    }

    pub fn create_if_missing(mut self, yes: bool) -> Self {
        self.create_if_missing = yes;
        self
    }

    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    pub fn session(mut self, session: SessionSettings) -> Self {
        self.session = session;
        self
    }

    /// Build options from the loaded configuration, validating its values.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        normalize_charset(&cfg.charset)?;

        if cfg.pool_size == 0 {
            return Err(AppError::Config("pool_size must be at least 1".into()));
        }

        Ok(Self {
            path: cfg.database.clone(),
            create_if_missing: cfg.create_if_missing,
            pool_size: cfg.pool_size,
            session: SessionSettings::with_time_zone(&cfg.time_zone)?,
        })
    }

    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_DATABASE
    }

    /// Connections the pool may open. Every `:memory:` connection is its own
    /// database, so those are capped at one.
    pub fn effective_pool_size(&self) -> usize {
        if self.is_memory() {
            1
        } else {
            self.pool_size.max(1)
        }
    }

    fn flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing || self.is_memory() {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        flags
    }

    /// Connection manager that opens, probes and sets up every connection
    /// the pool creates.
    pub fn manager(&self) -> SqliteConnectionManager {
        let session = self.session;
        let path = self.path.clone();

        SqliteConnectionManager::file(&self.path)
            .with_flags(self.flags())
            .with_init(move |conn| {
                // Opening is lazy in SQLite; reading the schema catches files
                // that are not databases.
                conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
                    row.get::<_, i64>(0)
                })?;
                session.apply(conn)?;

                tracing::debug!(
                    path = %path,
                    time_zone = %session.time_zone(),
                    "opened connection"
                );
                Ok(())
            })
    }

    pub(crate) fn connect_error(&self, e: rusqlite::Error) -> AppError {
        AppError::Connection(format!("cannot open database '{}': {e}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_padded_offsets() {
        assert_eq!(
            parse_utc_offset("+8:00").unwrap(),
            FixedOffset::east_opt(8 * 3600).unwrap()
        );
        assert_eq!(
            parse_utc_offset("-05:30").unwrap(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
        );
        assert_eq!(parse_utc_offset("UTC").unwrap(), utc());
    }

    #[test]
    fn rejects_malformed_offsets() {
        assert!(parse_utc_offset("8").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+08:75").is_err());
        assert!(parse_utc_offset("Asia/Shanghai").is_err());
    }

    #[test]
    fn default_session_is_plus_eight() {
        assert_eq!(SessionSettings::default().time_zone(), DEFAULT_TIME_ZONE);
    }

    #[test]
    fn charset_aliases() {
        assert_eq!(normalize_charset("utf8").unwrap(), "UTF-8");
        assert_eq!(normalize_charset("UTF8MB4").unwrap(), "UTF-8");
        assert!(normalize_charset("latin1").is_err());
    }

    #[test]
    fn memory_pool_is_capped() {
        assert_eq!(ConnectOptions::in_memory().pool_size(8).effective_pool_size(), 1);
        assert_eq!(ConnectOptions::new("x.sqlite").pool_size(3).effective_pool_size(), 3);
    }
}
