//! Syntax tree for property wrapper declarations.
//!
//! The declaration language is token-compatible with Rust so the same source
//! can be handed to a function-like procedural macro or tokenised from a file
//! by `proc-macro2`. Only the shapes the expansion pipeline inspects are
//! modelled explicitly: type declarations with their member lists, and
//! properties with their binding pattern, type, initializer and accessor
//! block. Everything else is carried through verbatim as opaque tokens.
//!
//! ```text
//! #[macrofy]
//! pub class Counter<Value> {
//!     pub let mut wrapped_value: Value;
//!     pub let mut projected_value: u64 { get { hits } }
//! }
//! ```

use proc_macro2::TokenStream;
use syn::{Attribute, Expr, Generics, Ident, Pat, Type, Visibility, token};

mod parse;
mod print;

/// A parsed source file: inner attributes followed by items.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Inner attributes such as `//!` documentation.
    pub attrs: Vec<Attribute>,
    /// Top-level items in source order.
    pub items: Vec<Item>,
}

/// A top-level item.
#[derive(Clone, Debug)]
pub enum Item {
    /// A braced type declaration (`struct`, `class`, `trait`, ...).
    Type(TypeDecl),
    /// Anything else, preserved verbatim.
    Opaque(Opaque),
}

impl Item {
    /// Outer attributes attached to the item.
    #[must_use]
    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Self::Type(decl) => &decl.attrs,
            Self::Opaque(opaque) => &opaque.attrs,
        }
    }

    /// Mutable access to the item's outer attributes.
    pub const fn attrs_mut(&mut self) -> &mut Vec<Attribute> {
        match self {
            Self::Type(decl) => &mut decl.attrs,
            Self::Opaque(opaque) => &mut opaque.attrs,
        }
    }

    /// The keyword introducing the item, used when reporting unsupported
    /// declaration kinds.
    #[must_use]
    pub fn keyword(&self) -> String {
        match self {
            Self::Type(decl) => decl.keyword.to_string(),
            Self::Opaque(opaque) => opaque.lead(),
        }
    }
}

/// A braced type declaration.
///
/// The `keyword` is kept as written; classification into supported kinds
/// happens during introspection.
#[derive(Clone, Debug)]
pub struct TypeDecl {
    /// Outer attributes.
    pub attrs: Vec<Attribute>,
    /// Declared visibility.
    pub vis: Visibility,
    /// Declaration keyword such as `struct` or `class`.
    pub keyword: Ident,
    /// Name of the declared type.
    pub ident: Ident,
    /// Generic parameters and the optional `where` clause.
    pub generics: Generics,
    /// Braces delimiting the member list.
    pub brace_token: token::Brace,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

/// Tokens the syntax tree does not interpret.
#[derive(Clone, Debug)]
pub struct Opaque {
    /// Outer attributes.
    pub attrs: Vec<Attribute>,
    /// Declared visibility.
    pub vis: Visibility,
    /// Remaining tokens, including the terminating `;`, `,` or brace group.
    pub tokens: TokenStream,
}

impl Opaque {
    /// First token of the opaque run rendered as text.
    #[must_use]
    pub fn lead(&self) -> String {
        self.tokens
            .clone()
            .into_iter()
            .next()
            .map_or_else(|| "item".to_owned(), |tt| tt.to_string())
    }
}

/// A member of a type declaration.
#[derive(Clone, Debug)]
pub enum Member {
    /// A `let` binding: stored or computed property.
    Property(Property),
    /// Any other member (methods, enum variants, ...).
    Opaque(Opaque),
}

impl Member {
    /// Outer attributes attached to the member.
    #[must_use]
    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Self::Property(property) => &property.attrs,
            Self::Opaque(opaque) => &opaque.attrs,
        }
    }

    /// Mutable access to the member's outer attributes.
    pub const fn attrs_mut(&mut self) -> &mut Vec<Attribute> {
        match self {
            Self::Property(property) => &mut property.attrs,
            Self::Opaque(opaque) => &mut opaque.attrs,
        }
    }
}

/// Whether a binding may be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingSpecifier {
    /// `let name`
    Immutable,
    /// `let mut name`
    Mutable,
}

/// A property declaration.
///
/// A property is stored when `accessors` is `None` and computed otherwise.
/// The grammar never produces both an initializer and an accessor block.
#[derive(Clone, Debug)]
pub struct Property {
    /// Outer attributes, including any wrapper attribute.
    pub attrs: Vec<Attribute>,
    /// Declared visibility.
    pub vis: Visibility,
    /// The `let` keyword.
    pub let_token: token::Let,
    /// Binding pattern; `mut` lives on identifier patterns.
    pub pat: Pat,
    /// Optional type annotation.
    pub ty: Option<Type>,
    /// Optional initializer expression.
    pub init: Option<Expr>,
    /// Optional accessor block.
    pub accessors: Option<AccessorBlock>,
}

impl Property {
    /// The bound identifier when the pattern is a single plain identifier.
    ///
    /// `ref` bindings, subpatterns and destructuring patterns yield `None`.
    #[must_use]
    pub fn ident(&self) -> Option<&Ident> {
        match &self.pat {
            Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => Some(&pat.ident),
            _ => None,
        }
    }

    /// The binding specifier declared on the pattern.
    ///
    /// Only identifier patterns can carry `mut`; every other pattern is
    /// reported as immutable.
    #[must_use]
    pub const fn specifier(&self) -> BindingSpecifier {
        match &self.pat {
            Pat::Ident(pat) if pat.mutability.is_some() => BindingSpecifier::Mutable,
            _ => BindingSpecifier::Immutable,
        }
    }
}

/// A braced accessor block.
#[derive(Clone, Debug)]
pub struct AccessorBlock {
    /// Braces around the block.
    pub brace_token: token::Brace,
    /// Block contents.
    pub body: AccessorBody,
}

impl AccessorBlock {
    /// Builds an explicit accessor list.
    #[must_use]
    pub fn new(accessors: Vec<Accessor>) -> Self {
        Self {
            brace_token: token::Brace::default(),
            body: AccessorBody::Accessors(accessors),
        }
    }

    /// Returns `true` when the block declares a `set` accessor.
    #[must_use]
    pub fn has_setter(&self) -> bool {
        match &self.body {
            AccessorBody::Accessors(accessors) => accessors
                .iter()
                .any(|accessor| accessor.kind == AccessorKind::Set),
            AccessorBody::Getter(_) => false,
        }
    }
}

/// Contents of an accessor block.
#[derive(Clone, Debug)]
pub enum AccessorBody {
    /// `{ get { .. } set { .. } }`
    Accessors(Vec<Accessor>),
    /// `{ expr }`: shorthand for a getter-only block.
    Getter(TokenStream),
}

/// Accessor kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessorKind {
    /// `get`
    Get,
    /// `set`
    Set,
}

/// A single accessor with an optional body.
#[derive(Clone, Debug)]
pub struct Accessor {
    /// Which accessor this is.
    pub kind: AccessorKind,
    /// Tokens inside the accessor's braces, if a body was written.
    pub body: Option<TokenStream>,
}

impl Accessor {
    /// A `get { body }` accessor.
    #[must_use]
    pub const fn getter(body: TokenStream) -> Self {
        Self {
            kind: AccessorKind::Get,
            body: Some(body),
        }
    }

    /// A `set { body }` accessor.
    #[must_use]
    pub const fn setter(body: TokenStream) -> Self {
        Self {
            kind: AccessorKind::Set,
            body: Some(body),
        }
    }
}
