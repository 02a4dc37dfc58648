//! Token printing for the declaration language.

use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};

use super::{
    Accessor, AccessorBlock, AccessorBody, AccessorKind, Item, Member, Opaque, Property,
    SourceFile, TypeDecl,
};

impl ToTokens for SourceFile {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
        tokens.append_all(&self.items);
    }
}

impl ToTokens for Item {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Type(decl) => decl.to_tokens(tokens),
            Self::Opaque(opaque) => opaque.to_tokens(tokens),
        }
    }
}

impl ToTokens for TypeDecl {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
        self.vis.to_tokens(tokens);
        self.keyword.to_tokens(tokens);
        self.ident.to_tokens(tokens);
        self.generics.to_tokens(tokens);
        self.generics.where_clause.to_tokens(tokens);
        self.brace_token.surround(tokens, |inner| inner.append_all(&self.members));
    }
}

impl ToTokens for Opaque {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
        self.vis.to_tokens(tokens);
        self.tokens.to_tokens(tokens);
    }
}

impl ToTokens for Member {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Property(property) => property.to_tokens(tokens),
            Self::Opaque(opaque) => opaque.to_tokens(tokens),
        }
    }
}

impl ToTokens for Property {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.attrs);
        self.vis.to_tokens(tokens);
        self.let_token.to_tokens(tokens);
        self.pat.to_tokens(tokens);
        if let Some(ty) = &self.ty {
            tokens.extend(quote!(: #ty));
        }
        if let Some(init) = &self.init {
            tokens.extend(quote!(= #init));
        }
        tokens.extend(
            self.accessors
                .as_ref()
                .map_or_else(|| quote!(;), ToTokens::to_token_stream),
        );
    }
}

impl ToTokens for AccessorBlock {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.brace_token.surround(tokens, |inner| match &self.body {
            AccessorBody::Accessors(accessors) => inner.append_all(accessors),
            AccessorBody::Getter(body) => body.to_tokens(inner),
        });
    }
}

impl ToTokens for Accessor {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self.kind {
            AccessorKind::Get => quote!(get),
            AccessorKind::Set => quote!(set),
        });
        if let Some(body) = &self.body {
            tokens.extend(quote!({ #body }));
        }
    }
}
