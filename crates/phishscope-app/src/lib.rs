//! PhishScope - command-line front end.
//!
//! Exposes the argument parser and subcommands so they can be tested without
//! spawning the binary.

pub mod cli;
pub mod commands;

pub use cli::{Args, Command};
