pub mod config;
pub mod fields;
pub mod render;
