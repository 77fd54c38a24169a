//! Tracing initialization for the CLI.
//!
//!   rdbhelper --debug ...              # debug logging to stderr
//!   RUST_LOG=rdbhelper=trace rdbhelper # fine-grained control

use crate::errors::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber. `RUST_LOG` wins over `debug`.
pub fn init_tracing(debug: bool) -> AppResult<()> {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| AppError::Config(format!("cannot initialize logging: {e}")))
}
