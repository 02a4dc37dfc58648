//! Property wrappers expressed as code generation.
//!
//! `macrofy` turns a property wrapper type into a macro-driven equivalent in
//! two steps:
//!
//! 1. **Introspection** reads a wrapper declaration marked `#[macrofy]`,
//!    derives a [`WrapperConfig`] from its `wrapped_value` and
//!    `projected_value` members and renders a `<Name>Macro` descriptor.
//! 2. **Synthesis** rewrites each property annotated with a registered
//!    wrapper into an accessor block delegating to private backing storage,
//!    plus a `$name` projected property when the wrapper declares one.
//!
//! [`expand_source`] runs both phases over a parsed [`syntax::SourceFile`]
//! and collects [`Diagnostic`]s for anything it cannot expand.
//!
//! ```
//! use macrofy::{Registry, expand_source, syntax::SourceFile};
//!
//! let file: SourceFile = syn::parse_quote! {
//!     #[macrofy]
//!     struct Logged { let mut wrapped_value: u8; }
//!
//!     struct Host {
//!         #[Logged] let mut level: u8 = 3;
//!     }
//! };
//! let expansion = expand_source(&file, &Registry::new());
//! assert!(expansion.is_clean());
//! assert!(expansion.tokens().to_string().contains("_level"));
//! ```

pub mod classify;
pub mod config;
pub mod diagnostic;
pub mod expand;
pub mod introspect;
pub mod synthesize;
pub mod syntax;

pub use classify::{find_member, is_settable};
pub use config::{PROJECTED_VALUE, WRAPPED_VALUE, WrapperConfig, WrapperMacro};
pub use diagnostic::{Diagnostic, DiagnosticId, ExpansionContext, ExpansionError, Severity};
pub use expand::{Expansion, Introspected, Registry, expand_source, introspect_source};
pub use introspect::{Declaration, Introspection, introspect};
pub use synthesize::{Synthesized, WrapperAttribute, synthesize};

#[doc(hidden)]
pub mod __private {
    //! Re-exports used by generated descriptors.
    pub use syn;
}
