//! rdbhelper library root.
//! The `db` module is the reusable part: one `Database` handle with raw
//! queries and insert/update helpers. The rest backs the CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod tracing_setup;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Ping => cli::commands::ping::handle(cfg),
        Commands::Query { .. } => cli::commands::query::handle(&cli.command, cfg),
        Commands::Insert { .. } => cli::commands::insert::handle(&cli.command, cfg),
        Commands::Update { .. } => cli::commands::update::handle(&cli.command, cfg),
        Commands::Exec { .. } => cli::commands::exec::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    tracing_setup::init_tracing(cli.debug)?;

    // in test mode the user's config file is neither read nor written
    let mut cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
