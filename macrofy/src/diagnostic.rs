//! Expansion failures and the diagnostics reported for them.
//!
//! Core operations return [`ExpansionError`] without location information.
//! The expansion driver pairs each error with the span of the attribute that
//! triggered it through an [`ExpansionContext`], which is then drained by the
//! procedural macro (as compile errors) or the command-line tool (as
//! `path:line:column` reports).

use std::fmt;

use proc_macro2::Span;
use syn::Attribute;
use syn::spanned::Spanned;
use thiserror::Error;

/// Domain prefixed to every diagnostic identifier.
pub const DIAGNOSTIC_DOMAIN: &str = "macrofy";

/// Errors raised while introspecting or synthesizing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpansionError {
    /// Introspection target is not a struct, class, actor or enum.
    #[error("`#[macrofy]` can only be applied to a struct, class, actor or enum, not `{keyword}`")]
    UnsupportedDeclarationKind {
        /// Keyword or leading token of the rejected declaration.
        keyword: String,
    },
    /// Wrapper declaration lacks a `wrapped_value` member.
    #[error("property wrapper `{wrapper}` must declare a `wrapped_value` property")]
    MissingWrappedValueMember {
        /// Name of the wrapper declaration.
        wrapper: String,
    },
    /// Synthesis target is not a property bound to a single identifier.
    #[error("property wrappers can only be applied to a property with a single identifier binding")]
    UnexpectedTargetShape,
    /// The wrapper attribute's argument list failed to parse.
    #[error("invalid property wrapper arguments: {0}")]
    InvalidArguments(#[from] syn::Error),
    /// The `#[macrofy(...)]` option list failed to parse.
    #[error("invalid `#[macrofy]` options: {0}")]
    InvalidOptions(syn::Error),
}

impl ExpansionError {
    /// Stable identifier of this failure.
    #[must_use]
    pub const fn id(&self) -> DiagnosticId {
        match self {
            Self::UnsupportedDeclarationKind { .. } => DiagnosticId::UnsupportedDeclaration,
            Self::MissingWrappedValueMember { .. } => DiagnosticId::MissingWrappedValue,
            Self::UnexpectedTargetShape => DiagnosticId::UnexpectedTargetShape,
            Self::InvalidArguments(_) => DiagnosticId::InvalidArguments,
            Self::InvalidOptions(_) => DiagnosticId::InvalidOptions,
        }
    }
}

/// Stable diagnostic identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticId {
    /// `unsupported_declaration`
    UnsupportedDeclaration,
    /// `missing_wrapped_value`
    MissingWrappedValue,
    /// `unexpected_target_shape`
    UnexpectedTargetShape,
    /// `invalid_arguments`
    InvalidArguments,
    /// `invalid_options`
    InvalidOptions,
}

impl DiagnosticId {
    /// Identifier text without the domain prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedDeclaration => "unsupported_declaration",
            Self::MissingWrappedValue => "missing_wrapped_value",
            Self::UnexpectedTargetShape => "unexpected_target_shape",
            Self::InvalidArguments => "invalid_arguments",
            Self::InvalidOptions => "invalid_options",
        }
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIAGNOSTIC_DOMAIN}::{}", self.as_str())
    }
}

/// Diagnostic severity. Every expansion failure is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Compilation cannot succeed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
        }
    }
}

/// An [`ExpansionError`] located at the attribute that triggered it.
#[derive(Debug)]
pub struct Diagnostic {
    error: ExpansionError,
    span: Span,
}

impl Diagnostic {
    /// Pairs an error with a span.
    #[must_use]
    pub const fn new(error: ExpansionError, span: Span) -> Self {
        Self { error, span }
    }

    /// The underlying error.
    #[must_use]
    pub const fn error(&self) -> &ExpansionError {
        &self.error
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> DiagnosticId {
        self.error.id()
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Always [`Severity::Error`].
    #[must_use]
    pub const fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Location of the triggering attribute.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Converts the diagnostic into a spanned compile error.
    #[must_use]
    pub fn to_syn_error(&self) -> syn::Error {
        syn::Error::new(self.span, self.message())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity(), self.id(), self.error)
    }
}

/// Collects diagnostics raised during one expansion run.
#[derive(Debug, Default)]
pub struct ExpansionContext {
    diagnostics: Vec<Diagnostic>,
}

impl ExpansionContext {
    /// An empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Records `error` at the span of `attribute`.
    pub fn diagnose(&mut self, attribute: &Attribute, error: ExpansionError) {
        self.diagnose_at(attribute.span(), error);
    }

    /// Records `error` at an explicit span.
    pub fn diagnose_at(&mut self, span: Span, error: ExpansionError) {
        tracing::debug!(id = %error.id(), %error, "expansion diagnostic");
        self.diagnostics.push(Diagnostic::new(error, span));
    }

    /// Consumes the context, yielding its diagnostics in emission order.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
