//! CLI command handlers

pub mod commands;

pub use commands::{companies, update, varieties, UpdateOptions};
