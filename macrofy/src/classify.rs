//! Member lookup and settability rules.

use crate::syntax::{AccessorBlock, BindingSpecifier, Member, Property};

/// Returns the first property whose binding is the plain identifier `name`.
///
/// Opaque members and destructuring patterns never match. Absence is not an
/// error; callers decide whether a missing member matters.
#[must_use]
pub fn find_member<'a>(members: &'a [Member], name: &str) -> Option<&'a Property> {
    members.iter().find_map(|member| match member {
        Member::Property(property) if property.ident().is_some_and(|ident| ident == name) => {
            Some(property)
        }
        _ => None,
    })
}

/// Returns `true` when assignments to the property are allowed.
///
/// An immutable binding is never settable, whatever accessors it declares.
/// A mutable stored property is settable; a mutable computed property is
/// settable only when its accessor block contains `set`.
#[must_use]
pub fn is_settable(property: &Property) -> bool {
    match property.specifier() {
        BindingSpecifier::Immutable => false,
        BindingSpecifier::Mutable => property
            .accessors
            .as_ref()
            .is_none_or(AccessorBlock::has_setter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};
    use proc_macro2::TokenStream;
    use quote::quote;
    use rstest::rstest;

    fn parse_members(input: syn::parse::ParseStream) -> syn::Result<Vec<Member>> {
        let mut members = Vec::new();
        while !input.is_empty() {
            members.push(input.parse()?);
        }
        Ok(members)
    }

    fn members(tokens: TokenStream) -> Result<Vec<Member>> {
        syn::parse::Parser::parse2(parse_members, tokens).context("members should parse")
    }

    #[rstest]
    #[case::stored_mutable(quote!(let mut wrapped_value: u8;), true)]
    #[case::stored_immutable(quote!(let wrapped_value: u8;), false)]
    #[case::getter_only_mutable(quote!(let mut wrapped_value: u8 { get { 1 } }), false)]
    #[case::getter_only_immutable(quote!(let wrapped_value: u8 { get { 1 } }), false)]
    #[case::implicit_getter_mutable(quote!(let mut wrapped_value: u8 { 1 }), false)]
    #[case::get_set_mutable(quote!(let mut wrapped_value: u8 { get { x } set { x = new_value } }), true)]
    #[case::bodyless_get_set(quote!(let mut wrapped_value: u8 { get set }), true)]
    #[case::immutable_with_setter(quote!(let wrapped_value: u8 { get { x } set { x = new_value } }), false)]
    fn settability(#[case] tokens: TokenStream, #[case] expected: bool) -> Result<()> {
        let members = members(tokens)?;
        let property = find_member(&members, "wrapped_value").context("member not found")?;
        ensure!(is_settable(property) == expected, "unexpected settability");
        Ok(())
    }

    #[rstest]
    fn finds_first_matching_property() -> Result<()> {
        let members = members(quote! {
            fn wrapped_value(&self) {}
            let (wrapped_value, other): (u8, u8);
            let wrapped_value: u8;
            let mut wrapped_value: u16;
        })?;
        let property = find_member(&members, "wrapped_value").context("member not found")?;
        ensure!(!is_settable(property), "the immutable declaration comes first");
        Ok(())
    }

    #[rstest]
    fn missing_member_is_none() -> Result<()> {
        let members = members(quote!(let mut value: u8;))?;
        ensure!(find_member(&members, "projected_value").is_none());
        Ok(())
    }
}
