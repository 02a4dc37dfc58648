//! Procedural macros for `macrofy`.
//!
//! [`macrofy!`] accepts one or more property wrapper declarations and emits a
//! `<Name>Macro` descriptor for each, implementing `macrofy::WrapperMacro`
//! with the configuration derived from the declaration's members. The
//! declarations themselves are consumed; only descriptors are emitted.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod descriptors;

/// Emits wrapper descriptors for the declarations in the input.
///
/// ```rust,ignore
/// macrofy_macros::macrofy! {
///     #[macrofy(crate = "my_macrofy")]
///     pub class Settable<Value> {
///         pub let mut wrapped_value: Value;
///     }
/// }
///
/// assert!(SettableMacro::config().is_reference_type);
/// ```
#[proc_macro]
pub fn macrofy(input: TokenStream) -> TokenStream {
    let file = parse_macro_input!(input as macrofy::syntax::SourceFile);
    descriptors::expand(&file)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
