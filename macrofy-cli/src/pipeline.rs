//! File-level expansion and introspection.

use std::io::Write;

use camino::Utf8Path;
use macrofy::syntax::SourceFile;
use macrofy::{Expansion, Registry, expand_source, introspect_source};
use quote::ToTokens;

use crate::error::MacrofyError;
use crate::fs_helpers;
use crate::registry::RegistryFile;
use crate::report::{format_diagnostic, location};

/// Rendered output of `macrofy expand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandReport {
    /// Expanded declarations, one item per paragraph.
    pub output: String,
    /// Diagnostics rendered as `path:line:column: error[id]: message`.
    pub diagnostics: Vec<String>,
}

/// Reads and parses a declaration file.
///
/// # Errors
///
/// Returns [`MacrofyError::Io`] when the file cannot be read and
/// [`MacrofyError::Parse`] with the failing location when it does not parse.
pub fn parse_file(path: &Utf8Path) -> Result<SourceFile, MacrofyError> {
    let source = fs_helpers::read_to_string(path)?;
    syn::parse_str(&source).map_err(|error| {
        let (line, column) = location(error.span());
        MacrofyError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            source: error,
        }
    })
}

/// Expands a declaration file against `registry`.
///
/// # Errors
///
/// See [`parse_file`]. Expansion diagnostics are not errors; they are
/// returned in the report.
pub fn expand_file(path: &Utf8Path, registry: &Registry) -> Result<ExpandReport, MacrofyError> {
    let file = parse_file(path)?;
    let expansion = expand_source(&file, registry);
    let diagnostics = expansion
        .diagnostics
        .iter()
        .map(|diagnostic| format_diagnostic(path, diagnostic))
        .collect();
    Ok(ExpandReport {
        output: render(&expansion),
        diagnostics,
    })
}

/// Introspects every `#[macrofy]` wrapper in a file and renders the result
/// as registry TOML.
///
/// # Errors
///
/// Fails when the file cannot be parsed, when any wrapper fails
/// introspection ([`MacrofyError::Diagnostics`]) or when rendering fails.
pub fn introspect_file(path: &Utf8Path) -> Result<String, MacrofyError> {
    let file = parse_file(path)?;
    let introspected = introspect_source(&file);
    if !introspected.is_clean() {
        for diagnostic in &introspected.diagnostics {
            tracing::warn!("{}", format_diagnostic(path, diagnostic));
        }
        return Err(MacrofyError::Diagnostics {
            count: introspected.diagnostics.len(),
        });
    }
    RegistryFile::from_registry(&introspected.registry).to_toml()
}

/// Renders an expansion with one item per paragraph.
#[must_use]
pub fn render(expansion: &Expansion) -> String {
    let mut rendered = String::new();
    for attr in &expansion.attrs {
        rendered.push_str(&attr.to_token_stream().to_string());
        rendered.push('\n');
    }
    for item in &expansion.items {
        if !rendered.is_empty() {
            rendered.push('\n');
        }
        rendered.push_str(&item.to_string());
        rendered.push('\n');
    }
    rendered
}

/// Writes `contents` to `output`, or to standard output when `None`.
///
/// # Errors
///
/// Returns [`MacrofyError::Io`] when writing fails.
pub fn emit(output: Option<&Utf8Path>, contents: &str) -> Result<(), MacrofyError> {
    output.map_or_else(
        || write_stdout(contents),
        |path| fs_helpers::write_string(path, contents),
    )
}

fn write_stdout(contents: &str) -> Result<(), MacrofyError> {
    std::io::stdout()
        .lock()
        .write_all(contents.as_bytes())
        .map_err(|source| MacrofyError::Io {
            path: "<stdout>".into(),
            source,
        })
}
