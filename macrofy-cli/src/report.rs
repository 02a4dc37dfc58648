//! Diagnostic rendering.

use camino::Utf8Path;
use macrofy::Diagnostic;
use proc_macro2::Span;

/// One-based line and column of the start of `span`.
#[must_use]
pub fn location(span: Span) -> (usize, usize) {
    let start = span.start();
    (start.line, start.column + 1)
}

/// Renders `path:line:column: error[id]: message`.
#[must_use]
pub fn format_diagnostic(path: &Utf8Path, diagnostic: &Diagnostic) -> String {
    let (line, column) = location(diagnostic.span());
    format!("{path}:{line}:{column}: {diagnostic}")
}
