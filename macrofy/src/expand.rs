//! Two-phase expansion of a declaration file.
//!
//! Phase one introspects every `#[macrofy]` wrapper declaration, registers
//! the derived configuration and renders its descriptor right after the
//! wrapper. Phase two rewrites every property carrying a registered wrapper
//! attribute: the attribute and initializer are removed, the synthesized
//! accessor block is attached and the storage and projected property are
//! inserted right after it. Failures are collected as diagnostics and never
//! abort the surrounding expansion.

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Path};

use crate::config::{WrapperConfig, WrapperMacro};
use crate::diagnostic::{Diagnostic, ExpansionContext, ExpansionError};
use crate::introspect::{Introspection, MacrofyArgs, is_macrofy_attribute};
use crate::synthesize::{Node, WrapperAttribute, placeholder, synthesize};
use crate::syntax::{Item, Member, SourceFile, TypeDecl};

/// Maps wrapper attribute paths to their configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    wrappers: BTreeMap<String, WrapperConfig>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wrappers: BTreeMap::new(),
        }
    }

    /// Registers `config` under `name`, replacing any previous entry.
    ///
    /// `name` is the attribute path as written, e.g. `Clamped` or
    /// `wrappers::Clamped`.
    pub fn register(&mut self, name: impl Into<String>, config: WrapperConfig) {
        self.wrappers.insert(name.into(), config);
    }

    /// Registers the configuration exposed by a descriptor type.
    pub fn register_macro<M: WrapperMacro>(&mut self, name: impl Into<String>) {
        self.register(name, M::config());
    }

    /// Looks up a wrapper by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WrapperConfig> {
        self.wrappers.get(name)
    }

    /// Looks up the wrapper named by an attribute path.
    #[must_use]
    pub fn lookup(&self, path: &Path) -> Option<&WrapperConfig> {
        self.get(&path_key(path))
    }

    /// Number of registered wrappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    /// Whether no wrapper is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Registered wrappers ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &WrapperConfig)> {
        self.wrappers
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }
}

impl Extend<(String, WrapperConfig)> for Registry {
    fn extend<T: IntoIterator<Item = (String, WrapperConfig)>>(&mut self, iter: T) {
        self.wrappers.extend(iter);
    }
}

impl FromIterator<(String, WrapperConfig)> for Registry {
    fn from_iter<T: IntoIterator<Item = (String, WrapperConfig)>>(iter: T) -> Self {
        Self {
            wrappers: iter.into_iter().collect(),
        }
    }
}

/// Registry key for an attribute path: segments joined by `::`.
#[must_use]
pub fn path_key(path: &Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Result of expanding a source file.
#[derive(Debug)]
pub struct Expansion {
    /// Inner attributes of the source file.
    pub attrs: Vec<Attribute>,
    /// Expanded items in source order, descriptors following their wrapper.
    pub items: Vec<TokenStream>,
    /// Wrappers introspected during phase one.
    pub introspected: Registry,
    /// Diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    /// The whole expanded file.
    #[must_use]
    pub fn tokens(&self) -> TokenStream {
        let attrs = &self.attrs;
        let items = &self.items;
        quote!(#(#attrs)* #(#items)*)
    }

    /// Whether expansion produced no diagnostics.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Result of introspecting the wrapper declarations of a source file.
#[derive(Debug)]
pub struct Introspected {
    /// Wrappers that introspected cleanly, keyed by name.
    pub registry: Registry,
    /// Introspection diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Introspected {
    /// Whether every `#[macrofy]` declaration introspected cleanly.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs phase one only: introspects every `#[macrofy]` declaration in
/// `file`. Wrapped properties are left alone.
#[must_use]
pub fn introspect_source(file: &SourceFile) -> Introspected {
    let mut context = ExpansionContext::new();
    let (registry, _descriptors) = introspect_items(file, &mut context);
    Introspected {
        registry,
        diagnostics: context.into_diagnostics(),
    }
}

/// Expands every wrapper declaration and wrapped property in `file`.
///
/// Wrappers introspected from the file take precedence over entries of
/// `registry` with the same name.
#[must_use]
pub fn expand_source(file: &SourceFile, registry: &Registry) -> Expansion {
    let mut context = ExpansionContext::new();
    let (introspected, descriptors) = introspect_items(file, &mut context);

    let mut wrappers = registry.clone();
    wrappers.extend(
        introspected
            .entries()
            .map(|(name, config)| (name.to_owned(), config.clone())),
    );

    let items = file
        .items
        .iter()
        .zip(descriptors)
        .map(|(item, descriptor)| {
            let mut tokens = expand_item(item, &wrappers, &mut context);
            tokens.extend(descriptor);
            tokens
        })
        .collect();

    let expansion = Expansion {
        attrs: file.attrs.clone(),
        items,
        introspected,
        diagnostics: context.into_diagnostics(),
    };
    tracing::debug!(
        items = expansion.items.len(),
        wrappers = expansion.introspected.len(),
        diagnostics = expansion.diagnostics.len(),
        "expanded source file"
    );
    expansion
}

/// Phase one: the derived registry and each item's descriptor, if any.
fn introspect_items(
    file: &SourceFile,
    context: &mut ExpansionContext,
) -> (Registry, Vec<Option<TokenStream>>) {
    let mut registry = Registry::new();
    let descriptors = file
        .items
        .iter()
        .map(|item| introspect_item(item, &mut registry, context))
        .collect();
    (registry, descriptors)
}

/// Phase one for a single item.
fn introspect_item(
    item: &Item,
    registry: &mut Registry,
    context: &mut ExpansionContext,
) -> Option<TokenStream> {
    let attr = item.attrs().iter().find(|attr| is_macrofy_attribute(attr))?;
    let args = match MacrofyArgs::from_attributes(item.attrs()) {
        Ok(args) => args,
        Err(error) => {
            context.diagnose(attr, ExpansionError::InvalidOptions(error));
            return None;
        }
    };
    match Introspection::of(item) {
        Ok(introspection) => {
            let descriptor = introspection.emit(&args.crate_path());
            registry.register(
                introspection.declaration.name().to_string(),
                introspection.config,
            );
            Some(descriptor)
        }
        Err(error) => {
            context.diagnose(attr, error);
            None
        }
    }
}

/// Phase two for a single item.
fn expand_item(item: &Item, registry: &Registry, context: &mut ExpansionContext) -> TokenStream {
    let mut attrs: Vec<Attribute> = item
        .attrs()
        .iter()
        .filter(|attr| !is_macrofy_attribute(attr))
        .cloned()
        .collect();
    // Wrapper attributes only apply to properties; on items they are
    // consumed and reported.
    if let Some((index, config)) = find_wrapper(&attrs, registry) {
        let attr = attrs.remove(index);
        if let Err(error) = WrapperAttribute::parse(&attr)
            .and_then(|attribute| synthesize(config, &attribute, Node::Item(item)))
        {
            context.diagnose(&attr, error);
        }
    }

    match item {
        Item::Type(decl) => {
            let members: TokenStream = decl
                .members
                .iter()
                .map(|member| expand_member(member, registry, context))
                .collect();
            render_type(decl, &attrs, &members)
        }
        Item::Opaque(original) => {
            let mut opaque = original.clone();
            opaque.attrs = attrs;
            opaque.into_token_stream()
        }
    }
}

fn render_type(decl: &TypeDecl, attrs: &[Attribute], members: &TokenStream) -> TokenStream {
    let TypeDecl {
        vis,
        keyword,
        ident,
        generics,
        ..
    } = decl;
    let where_clause = &generics.where_clause;
    quote! {
        #(#attrs)*
        #vis #keyword #ident #generics #where_clause {
            #members
        }
    }
}

/// First attribute naming a registered wrapper, with its configuration.
fn find_wrapper<'r>(
    attrs: &[Attribute],
    registry: &'r Registry,
) -> Option<(usize, &'r WrapperConfig)> {
    attrs
        .iter()
        .enumerate()
        .find_map(|(index, attr)| registry.lookup(attr.path()).map(|config| (index, config)))
}

fn expand_member(member: &Member, registry: &Registry, context: &mut ExpansionContext) -> TokenStream {
    let Some((index, config)) = find_wrapper(member.attrs(), registry) else {
        return member.to_token_stream();
    };
    let mut rewritten = member.clone();
    let attr = rewritten.attrs_mut().remove(index);
    let result = WrapperAttribute::parse(&attr)
        .and_then(|attribute| synthesize(config, &attribute, Node::Member(member)));

    match (rewritten, result) {
        (Member::Property(mut property), Ok(synthesized)) => {
            property.init = None;
            property.accessors = Some(synthesized.accessor_block());
            let peers = synthesized.peers();
            quote!(#property #peers)
        }
        (Member::Property(mut property), Err(error)) => {
            context.diagnose(&attr, error);
            property.init = None;
            property.accessors = Some(placeholder());
            property.into_token_stream()
        }
        (opaque @ Member::Opaque(_), outcome) => {
            if let Err(error) = outcome {
                context.diagnose(&attr, error);
            }
            opaque.into_token_stream()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticId;
    use anyhow::{Context, Result, ensure};
    use rstest::{fixture, rstest};

    #[fixture]
    fn wrappers() -> SourceFile {
        syn::parse_quote! {
            #[macrofy]
            pub class Clamped {
                pub let mut wrapped_value: i64 {
                    get { self.value }
                    set { self.value = new_value.clamp(self.min, self.max) }
                }
                pub let projected_value: i64 { get { self.max } }
            }

            struct Host {
                #[Clamped(min: 0, max: 10)]
                pub let mut level: i64 = 3;
                fn reset(&mut self) {}
            }
        }
    }

    #[rstest]
    fn expands_wrapper_and_host(wrappers: SourceFile) -> Result<()> {
        let expansion = expand_source(&wrappers, &Registry::new());
        ensure!(expansion.is_clean(), "unexpected diagnostics: {:?}", expansion.diagnostics);
        ensure!(expansion.introspected.get("Clamped").is_some());
        ensure!(expansion.items.len() == 2);

        let host = expansion.items.get(1).context("host missing")?;
        let expected = quote! {
            struct Host {
                pub let mut level: i64 {
                    get { _level.wrapped_value }
                    set { _level.wrapped_value = new_value }
                }
                let _level = Clamped(wrapped_value: 3, min: 0, max: 10);
                pub let $level: i64 { get { _level.projected_value } }
                fn reset(&mut self) {}
            }
        };
        ensure!(host.to_string() == expected.to_string(), "unexpected host: {host}");
        Ok(())
    }

    #[rstest]
    fn descriptor_follows_wrapper(wrappers: SourceFile) -> Result<()> {
        let expansion = expand_source(&wrappers, &Registry::new());
        let wrapper = expansion.items.first().context("wrapper missing")?.to_string();
        ensure!(!wrapper.contains("# [macrofy]"), "introspection attribute kept");
        ensure!(wrapper.contains("pub struct ClampedMacro"), "descriptor missing: {wrapper}");
        Ok(())
    }

    #[rstest]
    fn unsupported_wrapper_kind_emits_nothing() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            #[macrofy]
            trait Wrapper { let wrapped_value: u8; }
        };
        let expansion = expand_source(&file, &Registry::new());
        let ids: Vec<_> = expansion.diagnostics.iter().map(Diagnostic::id).collect();
        ensure!(ids == [DiagnosticId::UnsupportedDeclaration]);
        ensure!(expansion.introspected.is_empty());
        let rendered = expansion.tokens().to_string();
        ensure!(!rendered.contains("WrapperMacro"), "descriptor emitted: {rendered}");
        Ok(())
    }

    #[rstest]
    fn unknown_macrofy_option_is_reported() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            #[macrofy(krate = "alias")]
            struct Plain { let wrapped_value: u8; }
        };
        let expansion = expand_source(&file, &Registry::new());
        let diagnostic = expansion.diagnostics.first().context("diagnostic missing")?;
        ensure!(diagnostic.id() == DiagnosticId::InvalidOptions);
        ensure!(
            diagnostic.message().starts_with("invalid `#[macrofy]` options: "),
            "unexpected message {}",
            diagnostic.message()
        );
        ensure!(expansion.introspected.is_empty());
        Ok(())
    }

    #[rstest]
    fn introspection_ignores_host_properties(wrappers: SourceFile) -> Result<()> {
        let mut file = wrappers;
        file.items.push(syn::parse_quote! {
            struct Broken { #[Clamped] let (a, b): (i64, i64); }
        });
        let full = expand_source(&file, &Registry::new());
        ensure!(!full.is_clean(), "host property should be diagnosed");

        let introspected = introspect_source(&file);
        ensure!(introspected.is_clean(), "unexpected {:?}", introspected.diagnostics);
        ensure!(introspected.registry == full.introspected);
        ensure!(introspected.registry.len() == 1);
        Ok(())
    }

    #[rstest]
    fn destructuring_target_gets_placeholder() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            struct Host {
                #[Plain] let (a, b): (u8, u8) = (1, 2);
                #[Plain] let mut fine: u8;
            }
        };
        let mut registry = Registry::new();
        registry.register("Plain", WrapperConfig::default());
        let expansion = expand_source(&file, &registry);
        let ids: Vec<_> = expansion.diagnostics.iter().map(Diagnostic::id).collect();
        ensure!(ids == [DiagnosticId::UnexpectedTargetShape]);
        let expected = quote! {
            struct Host {
                let (a, b): (u8, u8) { get { panic!() } }
                let mut fine: u8 { get { _fine.wrapped_value } }
                let _fine = Plain();
            }
        };
        ensure!(expansion.tokens().to_string() == expected.to_string());
        Ok(())
    }

    #[rstest]
    fn only_first_wrapper_attribute_expands() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            struct Host {
                #[First] #[Second] let value: u8;
            }
        };
        let mut registry = Registry::new();
        registry.register("First", WrapperConfig::default());
        registry.register("Second", WrapperConfig::default());
        let expansion = expand_source(&file, &registry);
        let rendered = expansion.tokens().to_string();
        ensure!(rendered.contains("# [Second]"), "second attribute should remain");
        ensure!(rendered.contains("let _value = First ()"), "unexpected: {rendered}");
        Ok(())
    }

    #[rstest]
    fn wrapper_on_item_is_reported() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            #[Plain]
            struct Host { let value: u8; }
        };
        let mut registry = Registry::new();
        registry.register("Plain", WrapperConfig::default());
        let expansion = expand_source(&file, &registry);
        let ids: Vec<_> = expansion.diagnostics.iter().map(Diagnostic::id).collect();
        ensure!(ids == [DiagnosticId::UnexpectedTargetShape]);
        let expected = quote!(struct Host { let value: u8; });
        ensure!(expansion.tokens().to_string() == expected.to_string());
        Ok(())
    }

    #[rstest]
    fn unregistered_attributes_are_untouched() -> Result<()> {
        let file: SourceFile = syn::parse_quote! {
            struct Host {
                #[doc = "level"] let mut level: u8 = 1;
            }
        };
        let expansion = expand_source(&file, &Registry::new());
        ensure!(expansion.is_clean());
        ensure!(expansion.tokens().to_string() == quote!(#file).to_string());
        Ok(())
    }

    #[rstest]
    #[case::plain(syn::parse_quote!(Clamped), "Clamped")]
    #[case::qualified(syn::parse_quote!(wrappers::Clamped), "wrappers::Clamped")]
    #[case::absolute(syn::parse_quote!(::wrappers::Clamped), "wrappers::Clamped")]
    fn path_keys(#[case] path: Path, #[case] expected: &str) {
        assert_eq!(path_key(&path), expected);
    }

    struct CountedMacro;

    impl WrapperMacro for CountedMacro {
        fn config() -> WrapperConfig {
            WrapperConfig::new().with_projected_value_type(syn::parse_quote!(u64))
        }
    }

    #[rstest]
    fn registers_descriptor_types() -> Result<()> {
        let mut registry = Registry::new();
        registry.register_macro::<CountedMacro>("counters::Counted");
        let path: Path = syn::parse_quote!(counters::Counted);
        let config = registry.lookup(&path).context("descriptor not registered")?;
        ensure!(config.projected_value_type.is_some());
        Ok(())
    }
}
