//! Derives a [`WrapperConfig`] from a wrapper type declaration.
//!
//! Introspection is purely syntactic: the declaration keyword decides
//! whether the wrapper has reference semantics, and the reserved
//! `wrapped_value` and `projected_value` members decide which accessors the
//! synthesizer will emit. The result can be rendered as a `<Name>Macro`
//! descriptor implementing [`crate::WrapperMacro`].

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Ident, LitStr, Path, Visibility};

use crate::classify::{find_member, is_settable};
use crate::config::{PROJECTED_VALUE, WRAPPED_VALUE, WrapperConfig};
use crate::diagnostic::ExpansionError;
use crate::syntax::{Item, Member, TypeDecl};

/// Name of the attribute marking a wrapper declaration.
pub const MACROFY_ATTRIBUTE: &str = "macrofy";

/// Suffix appended to a wrapper's name to form its descriptor's name.
pub const DESCRIPTOR_SUFFIX: &str = "Macro";

/// The declaration kinds a wrapper may be.
#[derive(Clone, Copy, Debug)]
pub enum Declaration<'a> {
    /// Value aggregate.
    Struct(&'a TypeDecl),
    /// Reference class.
    Class(&'a TypeDecl),
    /// Reference actor.
    Actor(&'a TypeDecl),
    /// Tagged union.
    Enum(&'a TypeDecl),
}

impl<'a> Declaration<'a> {
    /// Classifies an item by its keyword.
    ///
    /// # Errors
    ///
    /// Returns [`ExpansionError::UnsupportedDeclarationKind`] for opaque items
    /// and any keyword other than `struct`, `class`, `actor` or `enum`.
    pub fn classify(item: &'a Item) -> Result<Self, ExpansionError> {
        let Item::Type(decl) = item else {
            return Err(unsupported(item.keyword()));
        };
        match decl.keyword.to_string().as_str() {
            "struct" => Ok(Self::Struct(decl)),
            "class" => Ok(Self::Class(decl)),
            "actor" => Ok(Self::Actor(decl)),
            "enum" => Ok(Self::Enum(decl)),
            other => Err(unsupported(other.to_owned())),
        }
    }

    /// The underlying type declaration.
    #[must_use]
    pub const fn decl(&self) -> &'a TypeDecl {
        match *self {
            Self::Struct(decl) | Self::Class(decl) | Self::Actor(decl) | Self::Enum(decl) => decl,
        }
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &'a [Member] {
        &self.decl().members
    }

    /// The declared type name.
    #[must_use]
    pub const fn name(&self) -> &'a Ident {
        &self.decl().ident
    }

    /// Classes and actors have reference semantics.
    #[must_use]
    pub const fn is_reference_type(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Actor(_))
    }
}

fn unsupported(keyword: String) -> ExpansionError {
    ExpansionError::UnsupportedDeclarationKind { keyword }
}

/// A classified wrapper declaration and the configuration derived from it.
#[derive(Clone, Debug)]
pub struct Introspection<'a> {
    /// The classified declaration.
    pub declaration: Declaration<'a>,
    /// The derived configuration.
    pub config: WrapperConfig,
}

impl<'a> Introspection<'a> {
    /// Introspects a wrapper declaration.
    ///
    /// # Errors
    ///
    /// Fails with [`ExpansionError::UnsupportedDeclarationKind`] or
    /// [`ExpansionError::MissingWrappedValueMember`]; the first failure wins.
    pub fn of(item: &'a Item) -> Result<Self, ExpansionError> {
        let declaration = Declaration::classify(item)?;
        let members = declaration.members();
        let wrapped = find_member(members, WRAPPED_VALUE).ok_or_else(|| {
            ExpansionError::MissingWrappedValueMember {
                wrapper: declaration.name().to_string(),
            }
        })?;

        let mut config = WrapperConfig::new()
            .with_reference_type(declaration.is_reference_type())
            .with_wrapped_value_settable(is_settable(wrapped));
        if let Some(projected) = find_member(members, PROJECTED_VALUE) {
            config = config.with_projected_value_settable(is_settable(projected));
            // Without an annotation there is no type to declare `$name` with.
            if let Some(ty) = &projected.ty {
                config = config.with_projected_value_type(ty.clone());
            }
        }

        tracing::debug!(wrapper = %declaration.name(), ?config, "introspected property wrapper");
        Ok(Self {
            declaration,
            config,
        })
    }

    /// Name of the descriptor type.
    #[must_use]
    pub fn descriptor_ident(&self) -> Ident {
        descriptor_ident(self.declaration.name())
    }

    /// Renders the descriptor declaration.
    #[must_use]
    pub fn emit(&self, crate_path: &TokenStream) -> TokenStream {
        let decl = self.declaration.decl();
        emit_descriptor(&decl.vis, &decl.ident, &self.config, crate_path)
    }
}

/// Derives the configuration of a wrapper declaration.
///
/// # Errors
///
/// See [`Introspection::of`].
pub fn introspect(item: &Item) -> Result<WrapperConfig, ExpansionError> {
    Introspection::of(item).map(|introspection| introspection.config)
}

/// `<Name>Macro` for a wrapper named `Name`.
#[must_use]
pub fn descriptor_ident(wrapper: &Ident) -> Ident {
    format_ident!("{}{}", wrapper, DESCRIPTOR_SUFFIX)
}

/// Renders a unit descriptor struct implementing `WrapperMacro`.
///
/// Only facts that differ from [`WrapperConfig::default`] are spelled out.
#[must_use]
pub fn emit_descriptor(
    vis: &Visibility,
    wrapper: &Ident,
    config: &WrapperConfig,
    crate_path: &TokenStream,
) -> TokenStream {
    let ident = descriptor_ident(wrapper);
    let doc = format!(" Property wrapper descriptor generated for `{wrapper}`.");
    let mut facts = Vec::new();
    if config.wrapped_value_is_settable {
        facts.push(quote!(wrapped_value_is_settable: true));
    }
    if config.projected_value_is_settable {
        facts.push(quote!(projected_value_is_settable: true));
    }
    if config.is_reference_type {
        facts.push(quote!(is_reference_type: true));
    }
    if let Some(ty) = &config.wrapper_type {
        facts.push(quote! {
            wrapper_type: ::core::option::Option::Some(#crate_path::__private::syn::parse_quote!(#ty))
        });
    }
    if let Some(ty) = &config.projected_value_type {
        facts.push(quote! {
            projected_value_type: ::core::option::Option::Some(#crate_path::__private::syn::parse_quote!(#ty))
        });
    }
    let body = if facts.is_empty() {
        quote!(::core::default::Default::default())
    } else {
        quote! {
            #crate_path::WrapperConfig {
                #(#facts,)*
                ..::core::default::Default::default()
            }
        }
    };

    quote! {
        #[doc = #doc]
        #[derive(Clone, Copy, Debug, Default)]
        #vis struct #ident;

        impl #crate_path::WrapperMacro for #ident {
            fn config() -> #crate_path::WrapperConfig {
                #body
            }
        }
    }
}

/// Returns `true` for `#[macrofy]` and `#[macrofy(..)]`.
#[must_use]
pub fn is_macrofy_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident(MACROFY_ATTRIBUTE)
}

/// Options accepted by the `#[macrofy]` attribute.
#[derive(Clone, Debug, Default)]
pub struct MacrofyArgs {
    /// Path used to reach this crate from generated code.
    pub crate_path: Option<Path>,
}

impl MacrofyArgs {
    /// Parses the options of a `#[macrofy]` attribute.
    ///
    /// # Errors
    ///
    /// Returns a `syn::Error` for unknown keys or a malformed `crate` value.
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut args = Self::default();
        if matches!(attr.meta, syn::Meta::Path(_)) {
            return Ok(args);
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                args.crate_path = Some(value.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported macrofy option; expected `crate`"))
            }
        })?;
        Ok(args)
    }

    /// Collects the options of every `#[macrofy]` attribute in `attrs`.
    ///
    /// # Errors
    ///
    /// Propagates the first parse failure.
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut merged = Self::default();
        for attr in attrs.iter().filter(|attr| is_macrofy_attribute(attr)) {
            let args = Self::from_attribute(attr)?;
            if args.crate_path.is_some() {
                merged.crate_path = args.crate_path;
            }
        }
        Ok(merged)
    }

    /// Tokens naming this crate in generated code.
    #[must_use]
    pub fn crate_path(&self) -> TokenStream {
        resolve_crate_path(self.crate_path.as_ref())
    }
}

/// Resolves the crate path used by generated descriptors.
///
/// Defaults to `macrofy`; an aliased dependency is reached through the path
/// given in `#[macrofy(crate = "...")]`.
#[must_use]
pub fn resolve_crate_path(crate_path: Option<&Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { macrofy }, |path| quote! { #path })
}
