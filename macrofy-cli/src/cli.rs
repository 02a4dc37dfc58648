//! Command-line interface definitions for `macrofy`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Parsed CLI arguments for `macrofy`.
#[derive(Debug, Parser)]
#[command(name = "macrofy")]
#[command(about = "Expand property wrapper declarations into accessors and storage")]
#[command(version)]
pub struct Args {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// `macrofy` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand wrapped properties and emit wrapper descriptors.
    Expand(ExpandArgs),
    /// Print the configuration of every `#[macrofy]` wrapper as registry TOML.
    Introspect(IntrospectArgs),
}

/// Arguments of `macrofy expand`.
#[derive(Debug, Clone, ClapArgs)]
pub struct ExpandArgs {
    /// Declaration file to expand.
    #[arg(value_name = "path")]
    pub input: Utf8PathBuf,
    /// Additional wrapper registry (repeat to layer several; later files win).
    #[arg(long, value_name = "path")]
    pub registry: Vec<Utf8PathBuf>,
    /// Skip the `macrofy.toml` registry in the working directory.
    #[arg(long = "no-default-registry")]
    pub should_skip_default_registry: bool,
    /// Write the expansion here instead of standard output.
    #[arg(long, short, value_name = "path")]
    pub output: Option<Utf8PathBuf>,
}

/// Arguments of `macrofy introspect`.
#[derive(Debug, Clone, ClapArgs)]
pub struct IntrospectArgs {
    /// Declaration file containing `#[macrofy]` wrappers.
    #[arg(value_name = "path")]
    pub input: Utf8PathBuf,
    /// Write the registry here instead of standard output.
    #[arg(long, short, value_name = "path")]
    pub output: Option<Utf8PathBuf>,
}
