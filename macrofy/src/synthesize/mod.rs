//! Accessor synthesis for wrapper-annotated properties.
//!
//! Given a [`WrapperConfig`] and the attribute that named the wrapper, a
//! property such as
//!
//! ```text
//! #[Clamped(0, max: 10)] pub let mut level: u8 = 3;
//! ```
//!
//! is turned into an accessor block routed through backing storage, plus the
//! peer declarations backing it:
//!
//! ```text
//! pub let mut level: u8 { get { _level.wrapped_value } set { _level.wrapped_value = new_value } }
//! let mut _level = Clamped(wrapped_value: 3, 0, max: 10);
//! ```

use proc_macro2::{Punct, Spacing, TokenStream};
use quote::{ToTokens, TokenStreamExt, format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Ident, Meta, Path, Token, Type, Visibility};

use crate::config::{PROJECTED_VALUE, WRAPPED_VALUE, WrapperConfig};
use crate::diagnostic::ExpansionError;
use crate::syntax::{Accessor, AccessorBlock, Item, Member};

/// Prefix of the backing storage identifier.
pub const STORAGE_PREFIX: &str = "_";

/// Name of the implicit setter parameter.
pub const NEW_VALUE: &str = "new_value";

/// One construction argument, optionally labelled.
#[derive(Clone, Debug)]
pub struct Argument {
    /// `label:` prefix, if any.
    pub label: Option<Ident>,
    /// Argument expression.
    pub value: Expr,
}

impl Argument {
    /// A labelled argument.
    #[must_use]
    pub const fn labelled(label: Ident, value: Expr) -> Self {
        Self {
            label: Some(label),
            value,
        }
    }

    /// An unlabelled argument.
    #[must_use]
    pub const fn positional(value: Expr) -> Self {
        Self { label: None, value }
    }
}

impl Parse for Argument {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let label = if input.peek(Ident) && input.peek2(Token![:]) && !input.peek2(Token![::]) {
            let label: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            Some(label)
        } else {
            None
        };
        Ok(Self {
            label,
            value: input.parse()?,
        })
    }
}

impl ToTokens for Argument {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        if let Some(label) = &self.label {
            tokens.extend(quote!(#label:));
        }
        self.value.to_tokens(tokens);
    }
}

/// A wrapper attribute with its parsed arguments.
#[derive(Clone, Debug)]
pub struct WrapperAttribute {
    /// Path naming the wrapper.
    pub path: Path,
    /// Arguments in source order.
    pub arguments: Vec<Argument>,
}

impl WrapperAttribute {
    /// Parses `#[W]`, `#[W(args..)]` or `#[W = expr]`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpansionError::InvalidArguments`] when the argument list is
    /// not a comma separated list of optionally labelled expressions.
    pub fn parse(attr: &Attribute) -> Result<Self, ExpansionError> {
        let arguments = match &attr.meta {
            Meta::Path(_) => Vec::new(),
            Meta::List(list) => list
                .parse_args_with(Punctuated::<Argument, Token![,]>::parse_terminated)?
                .into_iter()
                .collect(),
            Meta::NameValue(name_value) => vec![Argument::positional(name_value.value.clone())],
        };
        Ok(Self {
            path: attr.path().clone(),
            arguments,
        })
    }
}

/// The syntax node a wrapper attribute is attached to.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// A top-level item.
    Item(&'a Item),
    /// A member of a type declaration.
    Member(&'a Member),
}

/// Backing storage for a wrapped property.
#[derive(Clone, Debug)]
pub struct StorageDecl {
    /// `mut` when the storage must be reassignable.
    pub mutability: Option<Token![mut]>,
    /// `_<name>`
    pub ident: Ident,
    /// Constructed wrapper type.
    pub wrapper_type: TokenStream,
    /// Construction arguments.
    pub arguments: Vec<Argument>,
}

impl ToTokens for StorageDecl {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            mutability,
            ident,
            wrapper_type,
            arguments,
        } = self;
        tokens.extend(quote! {
            let #mutability #ident = #wrapper_type(#(#arguments),*);
        });
    }
}

/// The `$<name>` property exposing the projected value.
#[derive(Clone, Debug)]
pub struct ProjectedProperty {
    /// Visibility copied from the wrapped property.
    pub vis: Visibility,
    /// `mut` when the projected value is settable.
    pub mutability: Option<Token![mut]>,
    /// Name of the wrapped property; printed behind a `$` marker.
    pub ident: Ident,
    /// Projected value type.
    pub ty: Type,
    /// Getter and optional setter.
    pub accessors: AccessorBlock,
}

impl ToTokens for ProjectedProperty {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            vis,
            mutability,
            ident,
            ty,
            accessors,
        } = self;
        tokens.extend(quote!(#vis let #mutability));
        tokens.append(Punct::new('$', Spacing::Alone));
        tokens.extend(quote!(#ident: #ty #accessors));
    }
}

/// Declarations produced for one wrapped property.
#[derive(Clone, Debug)]
pub struct Synthesized {
    /// Backing storage.
    pub storage: StorageDecl,
    /// Accessors replacing the property's stored form.
    pub accessors: Vec<Accessor>,
    /// Projected property, when the wrapper declares a typed projection.
    pub projected: Option<ProjectedProperty>,
}

impl Synthesized {
    /// The accessors wrapped in a block, ready to attach to the property.
    #[must_use]
    pub fn accessor_block(&self) -> AccessorBlock {
        AccessorBlock::new(self.accessors.clone())
    }

    /// Storage followed by the projected property, if any.
    #[must_use]
    pub fn peers(&self) -> TokenStream {
        let storage = &self.storage;
        let projected = &self.projected;
        quote!(#storage #projected)
    }
}

/// Synthesizes storage and accessors for a wrapper-annotated property.
///
/// # Errors
///
/// Returns [`ExpansionError::UnexpectedTargetShape`] when `target` is not a
/// property bound to a single plain identifier.
pub fn synthesize(
    config: &WrapperConfig,
    attribute: &WrapperAttribute,
    target: Node<'_>,
) -> Result<Synthesized, ExpansionError> {
    let Node::Member(Member::Property(property)) = target else {
        return Err(ExpansionError::UnexpectedTargetShape);
    };
    let ident = property
        .ident()
        .ok_or(ExpansionError::UnexpectedTargetShape)?;
    let storage_ident = format_ident!("{}{}", STORAGE_PREFIX, ident);
    let wrapped = format_ident!("{}", WRAPPED_VALUE);
    let new_value = format_ident!("{}", NEW_VALUE);

    let arguments = property
        .init
        .iter()
        .map(|init| Argument::labelled(wrapped.clone(), init.clone()))
        .chain(attribute.arguments.iter().cloned())
        .collect();
    let storage = StorageDecl {
        mutability: config.storage_is_mutable().then(Default::default),
        ident: storage_ident.clone(),
        wrapper_type: config.wrapper_type_tokens(&attribute.path),
        arguments,
    };

    let mut accessors = vec![Accessor::getter(quote!(#storage_ident.#wrapped))];
    if config.wrapped_value_is_settable {
        accessors.push(Accessor::setter(quote!(#storage_ident.#wrapped = #new_value)));
    }

    let projected = config.projected_value_type.as_ref().map(|ty| {
        let projected_value = format_ident!("{}", PROJECTED_VALUE);
        let mut projection = vec![Accessor::getter(quote!(#storage_ident.#projected_value))];
        if config.projected_value_is_settable {
            projection.push(Accessor::setter(
                quote!(#storage_ident.#projected_value = #new_value),
            ));
        }
        ProjectedProperty {
            vis: property.vis.clone(),
            mutability: config.projected_value_is_settable.then(Default::default),
            ident: ident.clone(),
            ty: ty.clone(),
            accessors: AccessorBlock::new(projection),
        }
    });

    tracing::debug!(
        property = %ident,
        wrapper = %attribute.path.to_token_stream(),
        storage_is_mutable = storage.mutability.is_some(),
        projected = projected.is_some(),
        "synthesized wrapped property"
    );
    Ok(Synthesized {
        storage,
        accessors,
        projected,
    })
}

/// The inert accessor left behind when synthesis fails.
#[must_use]
pub fn placeholder() -> AccessorBlock {
    AccessorBlock::new(vec![Accessor::getter(quote!(panic!()))])
}
