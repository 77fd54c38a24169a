//! User-facing CLI messages. Diagnostics go through `tracing`, not here.

use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}{ICON_INFO}{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{GREEN}{BOLD}{ICON_OK}{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{YELLOW}{BOLD}{ICON_WARN}{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{RED}{BOLD}{ICON_ERR}{RESET} {msg}");
}

/// `• label: value` line, as used by `ping`.
pub fn field<T: fmt::Display>(label: &str, value: T) {
    println!("{CYAN}• {label}:{RESET} {value}");
}
