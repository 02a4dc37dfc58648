//! `syn` parsers for the declaration language.

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Generics, Ident, Pat, PatIdent, Token, Visibility, WhereClause, braced, token};

use super::{
    Accessor, AccessorBlock, AccessorBody, AccessorKind, Item, Member, Opaque, Property,
    SourceFile, TypeDecl,
};

mod kw {
    syn::custom_keyword!(get);
    syn::custom_keyword!(set);
}

impl Parse for SourceFile {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_inner)?;
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Self { attrs, items })
    }
}

impl Parse for Item {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        if starts_type_decl(input) {
            parse_type_decl(attrs, vis, input).map(Self::Type)
        } else {
            parse_opaque(attrs, vis, input).map(Self::Opaque)
        }
    }
}

/// Looks ahead for `keyword Name <generics>? where..? {`.
fn starts_type_decl(input: ParseStream) -> bool {
    let fork = input.fork();
    fork.call(Ident::parse_any).is_ok()
        && fork.parse::<Ident>().is_ok()
        && fork.parse::<Generics>().is_ok()
        && fork.parse::<Option<WhereClause>>().is_ok()
        && fork.peek(token::Brace)
}

fn parse_type_decl(
    attrs: Vec<Attribute>,
    vis: Visibility,
    input: ParseStream,
) -> syn::Result<TypeDecl> {
    let keyword = input.call(Ident::parse_any)?;
    let ident: Ident = input.parse()?;
    let mut generics: Generics = input.parse()?;
    generics.where_clause = input.parse()?;
    let content;
    let brace_token = braced!(content in input);
    let mut members = Vec::new();
    while !content.is_empty() {
        members.push(content.parse()?);
    }
    Ok(TypeDecl {
        attrs,
        vis,
        keyword,
        ident,
        generics,
        brace_token,
        members,
    })
}

impl Parse for Member {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        if input.peek(Token![let]) {
            parse_property(attrs, vis, input).map(Self::Property)
        } else {
            parse_opaque(attrs, vis, input).map(Self::Opaque)
        }
    }
}

fn parse_property(
    attrs: Vec<Attribute>,
    vis: Visibility,
    input: ParseStream,
) -> syn::Result<Property> {
    let let_token: Token![let] = input.parse()?;
    let pat = parse_binding(input)?;
    let ty = if input.peek(Token![:]) {
        input.parse::<Token![:]>()?;
        Some(input.parse()?)
    } else {
        None
    };

    let mut init = None;
    let mut accessors = None;
    if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        init = Some(input.parse()?);
        input.parse::<Token![;]>()?;
    } else if input.peek(token::Brace) {
        accessors = Some(input.parse()?);
        input.parse::<Option<Token![;]>>()?;
    } else {
        input.parse::<Token![;]>()?;
    }

    Ok(Property {
        attrs,
        vis,
        let_token,
        pat,
        ty,
        init,
        accessors,
    })
}

/// Parses a binding pattern.
///
/// An identifier followed by a brace group is the name of a computed
/// property, never a struct pattern. Tuple struct patterns, paths and `@`
/// subpatterns defer to `syn`.
fn parse_binding(input: ParseStream) -> syn::Result<Pat> {
    let fork = input.fork();
    fork.parse::<Option<Token![mut]>>()?;
    let is_plain_ident = fork.peek(Ident)
        && !(fork.peek2(token::Paren) || fork.peek2(Token![::]) || fork.peek2(Token![@]));
    if !is_plain_ident {
        return Pat::parse_single(input);
    }
    let mutability: Option<Token![mut]> = input.parse()?;
    let ident: Ident = input.parse()?;
    Ok(Pat::Ident(PatIdent {
        attrs: Vec::new(),
        by_ref: None,
        mutability,
        ident,
        subpat: None,
    }))
}

impl Parse for AccessorBlock {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let content;
        let brace_token = braced!(content in input);
        let body = if content.is_empty() || content.peek(kw::get) || content.peek(kw::set) {
            let mut accessors = Vec::new();
            while !content.is_empty() {
                accessors.push(content.parse()?);
                content.parse::<Option<Token![;]>>()?;
            }
            AccessorBody::Accessors(accessors)
        } else {
            AccessorBody::Getter(content.parse()?)
        };
        Ok(Self { brace_token, body })
    }
}

impl Parse for Accessor {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        let kind = if lookahead.peek(kw::get) {
            input.parse::<kw::get>()?;
            AccessorKind::Get
        } else if lookahead.peek(kw::set) {
            input.parse::<kw::set>()?;
            AccessorKind::Set
        } else {
            return Err(lookahead.error());
        };
        let body = if input.peek(token::Brace) {
            let content;
            braced!(content in input);
            Some(content.parse()?)
        } else {
            None
        };
        Ok(Self { kind, body })
    }
}

fn parse_opaque(attrs: Vec<Attribute>, vis: Visibility, input: ParseStream) -> syn::Result<Opaque> {
    let tokens = opaque_tokens(input)?;
    if tokens.is_empty() {
        return Err(input.error("expected a declaration"));
    }
    Ok(Opaque { attrs, vis, tokens })
}

/// Consumes tokens up to and including the first top-level `;` or `,`, or
/// the first brace group (plus a trailing `;` if one follows).
fn opaque_tokens(input: ParseStream) -> syn::Result<TokenStream> {
    input.step(|cursor| {
        let mut tokens = TokenStream::new();
        let mut rest = *cursor;
        while let Some((tt, next)) = rest.token_tree() {
            rest = next;
            let ends_with_separator =
                matches!(&tt, TokenTree::Punct(punct) if matches!(punct.as_char(), ';' | ','));
            let ends_with_block =
                matches!(&tt, TokenTree::Group(group) if group.delimiter() == Delimiter::Brace);
            tokens.extend([tt]);
            if ends_with_separator {
                return Ok((tokens, rest));
            }
            if ends_with_block {
                if let Some((punct, after)) = rest.punct()
                    && punct.as_char() == ';'
                {
                    tokens.extend([TokenTree::Punct(punct)]);
                    rest = after;
                }
                return Ok((tokens, rest));
            }
        }
        Ok((tokens, rest))
    })
}
