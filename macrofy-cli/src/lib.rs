//! Library interface for the `macrofy` command-line tool.
//!
//! The tool reads declaration files, loads wrapper registries layered from
//! `macrofy.toml` and `--registry` files, and either expands wrapped
//! properties (`macrofy expand`) or prints the configuration derived from
//! `#[macrofy]` wrappers (`macrofy introspect`).

pub mod cli;
pub mod error;
pub mod fs_helpers;
pub mod pipeline;
pub mod registry;
pub mod report;
