//! CLI entrypoint for `macrofy`.

use std::io::Write;

use camino::Utf8Path;
use clap::Parser;
use macrofy_cli::cli::{Args, Command, ExpandArgs, IntrospectArgs};
use macrofy_cli::error::MacrofyError;
use macrofy_cli::pipeline;
use macrofy_cli::registry::{DEFAULT_REGISTRY_FILE, load_registry};

fn main() -> Result<(), MacrofyError> {
    init_tracing();
    run()
}

fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn run() -> Result<(), MacrofyError> {
    let args = Args::parse();
    match args.command {
        Command::Expand(expand) => run_expand(&expand),
        Command::Introspect(introspect) => run_introspect(&introspect),
    }
}

fn run_expand(args: &ExpandArgs) -> Result<(), MacrofyError> {
    let default_registry =
        (!args.should_skip_default_registry).then(|| Utf8Path::new(DEFAULT_REGISTRY_FILE));
    let registry = load_registry(default_registry, &args.registry)?;
    let report = pipeline::expand_file(&args.input, &registry)?;
    pipeline::emit(args.output.as_deref(), &report.output)?;
    if report.diagnostics.is_empty() {
        return Ok(());
    }

    let mut stderr = std::io::stderr().lock();
    for line in &report.diagnostics {
        tracing::warn!(diagnostic = %line, "expansion diagnostic");
        writeln!(stderr, "{line}").map_err(|source| MacrofyError::Io {
            path: "<stderr>".into(),
            source,
        })?;
    }
    Err(MacrofyError::Diagnostics {
        count: report.diagnostics.len(),
    })
}

fn run_introspect(args: &IntrospectArgs) -> Result<(), MacrofyError> {
    let rendered = pipeline::introspect_file(&args.input)?;
    pipeline::emit(args.output.as_deref(), &rendered)
}
