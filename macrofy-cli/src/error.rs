//! Error types for `macrofy`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `macrofy` command-line pipeline.
#[derive(Debug, Error)]
pub enum MacrofyError {
    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The declaration file is not valid.
    #[error("{path}:{line}:{column}: {source}")]
    Parse {
        /// Declaration file.
        path: Utf8PathBuf,
        /// One-based line of the offending token.
        line: usize,
        /// One-based column of the offending token.
        column: usize,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// A registry file could not be merged or deserialized.
    #[error("failed to load wrapper registry: {0}")]
    Registry(#[from] Box<figment::Error>),

    /// A registry entry names a type that does not parse.
    #[error("invalid `{field}` for wrapper '{wrapper}': {source}")]
    InvalidType {
        /// Registry key of the wrapper.
        wrapper: String,
        /// Offending field.
        field: &'static str,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// The introspected registry could not be rendered.
    #[error("failed to render registry TOML: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Expansion completed but reported diagnostics.
    #[error("expansion reported {count} diagnostic(s)")]
    Diagnostics {
        /// Number of diagnostics.
        count: usize,
    },
}

impl From<figment::Error> for MacrofyError {
    fn from(error: figment::Error) -> Self {
        Self::Registry(Box::new(error))
    }
}
