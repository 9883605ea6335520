//! CLI module for the `botwatch` binary
//!
//! This module contains all CLI-related functionality including:
//! - Command line argument parsing
//! - Output formatting

pub mod commands;
pub mod output;

pub use commands::*;
pub use output::*;
