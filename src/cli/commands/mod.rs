pub mod config;
pub mod exec;
pub mod init;
pub mod insert;
pub mod ping;
pub mod query;
pub mod update;
