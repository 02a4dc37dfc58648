//! Descriptor generation for `macrofy!`.

use macrofy::Diagnostic;
use macrofy::introspect::{Introspection, MacrofyArgs, is_macrofy_attribute};
use macrofy::syntax::{Item, SourceFile};
use proc_macro2::{Span, TokenStream};
use syn::spanned::Spanned;

/// Renders the descriptors of every declaration in `file`.
///
/// Failures are combined so that every rejected declaration is reported in
/// a single compilation.
pub(crate) fn expand(file: &SourceFile) -> syn::Result<TokenStream> {
    let mut output = TokenStream::new();
    let mut errors = Vec::new();
    for item in &file.items {
        match descriptor(item) {
            Ok(tokens) => output.extend(tokens),
            Err(error) => errors.push(error),
        }
    }
    errors
        .into_iter()
        .reduce(|mut combined, error| {
            combined.combine(error);
            combined
        })
        .map_or(Ok(output), Err)
}

fn descriptor(item: &Item) -> syn::Result<TokenStream> {
    let args = MacrofyArgs::from_attributes(item.attrs())?;
    let introspection = Introspection::of(item)
        .map_err(|error| Diagnostic::new(error, error_span(item)).to_syn_error())?;
    Ok(introspection.emit(&args.crate_path()))
}

/// The `#[macrofy]` attribute when present, otherwise the whole item.
fn error_span(item: &Item) -> Span {
    item.attrs()
        .iter()
        .find(|attr| is_macrofy_attribute(attr))
        .map_or_else(|| item.span(), Spanned::span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use quote::quote;
    use rstest::rstest;

    fn file(tokens: TokenStream) -> Result<SourceFile> {
        Ok(syn::parse2(tokens)?)
    }

    #[rstest]
    fn emits_one_descriptor_per_declaration() -> Result<()> {
        let tokens = expand(&file(quote! {
            pub struct Plain<Value> { pub let wrapped_value: Value; }
            #[macrofy(crate = "alias")]
            class Shared<Value> { let mut wrapped_value: Value; }
        })?)?;
        let rendered = tokens.to_string();
        ensure!(rendered.contains("pub struct PlainMacro"));
        ensure!(rendered.contains("struct SharedMacro"));
        ensure!(rendered.contains("impl alias :: WrapperMacro for SharedMacro"));
        ensure!(rendered.contains("impl macrofy :: WrapperMacro for PlainMacro"));
        Ok(())
    }

    #[rstest]
    fn combines_errors_from_every_declaration() -> Result<()> {
        let result = expand(&file(quote! {
            trait Unsupported { let wrapped_value: u8; }
            struct Fine { let wrapped_value: u8; }
            struct Missing { let value: u8; }
        })?);
        let Err(error) = result else {
            return Err(anyhow!("expansion should fail"));
        };
        let messages: Vec<String> = error.into_iter().map(|single| single.to_string()).collect();
        ensure!(messages.len() == 2, "expected two errors, got {messages:?}");
        ensure!(messages.iter().any(|message| message.contains("`trait`")));
        ensure!(messages.iter().any(|message| message.contains("`Missing`")));
        Ok(())
    }

    #[rstest]
    fn rejects_unknown_options() -> Result<()> {
        let result = expand(&file(quote! {
            #[macrofy(krate = "alias")]
            struct Plain { let wrapped_value: u8; }
        })?);
        ensure!(result.is_err());
        Ok(())
    }
}
