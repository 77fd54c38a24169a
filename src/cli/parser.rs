use crate::core::render::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for rdbhelper
#[derive(Parser)]
#[command(
    name = "rdbhelper",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run queries and insert/update rows against a SQLite database",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Enable debug logging on stderr
    #[arg(global = true, long = "debug")]
    pub debug: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and create the database
    Init,

    /// Print or edit the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Connect and show the session settings
    Ping,

    /// Run a SQL statement and print its rows
    Query {
        /// SQL text, executed verbatim
        sql: String,

        #[arg(long, short, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Insert one row
    Insert {
        table: String,

        /// Values as column=value (NULL, true/false, numbers, 'quoted text')
        #[arg(required = true, value_name = "COLUMN=VALUE")]
        fields: Vec<String>,

        #[arg(long = "dry-run", help = "Print the statement without running it")]
        dry_run: bool,
    },

    /// Update rows matching a predicate
    Update {
        table: String,

        /// Values as column=value (NULL, true/false, numbers, 'quoted text')
        #[arg(required = true, value_name = "COLUMN=VALUE")]
        fields: Vec<String>,

        /// Raw SQL predicate, e.g. "name='Alice'"
        #[arg(long = "where", short = 'w', value_name = "PREDICATE")]
        where_clause: String,

        #[arg(long = "dry-run", help = "Print the statement without running it")]
        dry_run: bool,
    },

    /// Run a multi-statement SQL script
    #[command(group(ArgGroup::new("source").required(true).args(["sql", "file"])))]
    Exec {
        sql: Option<String>,

        #[arg(long, value_name = "FILE")]
        file: Option<String>,
    },
}
