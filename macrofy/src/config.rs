//! Configuration model controlling accessor synthesis.
//!
//! A [`WrapperConfig`] records what is unusual about a wrapper type: whether
//! its wrapped and projected values can be assigned, whether it has
//! reference semantics, and which type expressions to emit. Every field
//! defaults to the conservative choice, so a configuration only needs to
//! spell out the facts that differ.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Path, Type};

/// Reserved name of the member holding the wrapped value.
pub const WRAPPED_VALUE: &str = "wrapped_value";

/// Reserved name of the optional member holding the projected value.
pub const PROJECTED_VALUE: &str = "projected_value";

/// Derived or hand-authored facts about a property wrapper type.
///
/// # Examples
///
/// ```
/// use macrofy::WrapperConfig;
///
/// let config = WrapperConfig::new()
///     .with_wrapped_value_settable(true)
///     .with_reference_type(true);
/// assert!(!config.storage_is_mutable());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapperConfig {
    /// Emit a setter for the wrapped value.
    pub wrapped_value_is_settable: bool,
    /// Emit a setter for the projected value.
    pub projected_value_is_settable: bool,
    /// The wrapper has reference semantics, so its storage never needs a
    /// mutable binding.
    pub is_reference_type: bool,
    /// Type constructed for the backing storage. `None` uses the path of the
    /// attribute that triggered the expansion.
    pub wrapper_type: Option<Type>,
    /// Type of the projected property. `None` suppresses it.
    pub projected_value_type: Option<Type>,
}

impl WrapperConfig {
    /// A configuration with every fact at its default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wrapped_value_is_settable: false,
            projected_value_is_settable: false,
            is_reference_type: false,
            wrapper_type: None,
            projected_value_type: None,
        }
    }

    /// Sets [`Self::wrapped_value_is_settable`].
    #[must_use]
    pub const fn with_wrapped_value_settable(mut self, settable: bool) -> Self {
        self.wrapped_value_is_settable = settable;
        self
    }

    /// Sets [`Self::projected_value_is_settable`].
    #[must_use]
    pub const fn with_projected_value_settable(mut self, settable: bool) -> Self {
        self.projected_value_is_settable = settable;
        self
    }

    /// Sets [`Self::is_reference_type`].
    #[must_use]
    pub const fn with_reference_type(mut self, is_reference_type: bool) -> Self {
        self.is_reference_type = is_reference_type;
        self
    }

    /// Overrides the constructed wrapper type.
    #[must_use]
    pub fn with_wrapper_type(mut self, ty: Type) -> Self {
        self.wrapper_type = Some(ty);
        self
    }

    /// Declares the projected value and its type.
    #[must_use]
    pub fn with_projected_value_type(mut self, ty: Type) -> Self {
        self.projected_value_type = Some(ty);
        self
    }

    /// Whether the backing storage must be bound with `let mut`.
    ///
    /// Reference wrappers mutate through the shared instance; value wrappers
    /// need a reassignable binding exactly when something behind them is
    /// settable.
    #[must_use]
    pub const fn storage_is_mutable(&self) -> bool {
        !self.is_reference_type && (self.wrapped_value_is_settable || self.projected_value_is_settable)
    }

    /// Tokens naming the wrapper type, falling back to the attribute path.
    #[must_use]
    pub fn wrapper_type_tokens(&self, attribute_path: &Path) -> TokenStream {
        self.wrapper_type.as_ref().map_or_else(
            || attribute_path.to_token_stream(),
            ToTokens::to_token_stream,
        )
    }
}

/// A descriptor type exposing a wrapper configuration.
///
/// Descriptors are usually generated by `macrofy!` or by the expansion
/// driver's introspection phase, and can be registered by type with
/// [`crate::Registry::register_macro`].
pub trait WrapperMacro {
    /// The wrapper's configuration.
    fn config() -> WrapperConfig;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use syn::parse_quote;

    #[rstest]
    #[case::all_defaults(false, false, false, false)]
    #[case::wrapped_settable(false, true, false, true)]
    #[case::projected_settable(false, false, true, true)]
    #[case::both_settable(false, true, true, true)]
    #[case::reference_wrapped(true, true, false, false)]
    #[case::reference_projected(true, false, true, false)]
    #[case::reference_both(true, true, true, false)]
    fn storage_mutability_follows_reference_semantics(
        #[case] is_reference_type: bool,
        #[case] wrapped: bool,
        #[case] projected: bool,
        #[case] expected: bool,
    ) {
        let config = WrapperConfig::new()
            .with_reference_type(is_reference_type)
            .with_wrapped_value_settable(wrapped)
            .with_projected_value_settable(projected);
        assert_eq!(config.storage_is_mutable(), expected);
    }

    #[rstest]
    fn new_matches_default() {
        assert_eq!(WrapperConfig::new(), WrapperConfig::default());
    }

    #[rstest]
    fn wrapper_type_defaults_to_attribute_path() {
        let path: Path = parse_quote!(wrappers::Clamped);
        let tokens = WrapperConfig::new().wrapper_type_tokens(&path);
        assert_eq!(tokens.to_string(), quote::quote!(wrappers::Clamped).to_string());
    }

    #[rstest]
    fn wrapper_type_override_wins() {
        let path: Path = parse_quote!(Clamped);
        let config = WrapperConfig::new().with_wrapper_type(parse_quote!(clamp::Clamped<u8>));
        let tokens = config.wrapper_type_tokens(&path);
        assert_eq!(tokens.to_string(), quote::quote!(clamp::Clamped<u8>).to_string());
    }
}
