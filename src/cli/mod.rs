//! CLI command handlers

pub mod commands;

pub use commands::{fill, get, inspect};
