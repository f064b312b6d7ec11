//! Tests for schema token generation.

use super::*;
use crate::derive::crate_path;
use crate::derive::parse::parse_input;
use anyhow::{Context, Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, ItemImpl};

fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let parsed = parse_input(input).map_err(|err| anyhow!("parse failed: {err}"))?;
    let krate = crate_path::resolve(parsed.attrs.crate_path.as_ref());
    Ok(generate_impls(&parsed, &krate))
}

fn field_of(input: &DeriveInput) -> Result<TokenStream> {
    let parsed = parse_input(input).map_err(|err| anyhow!("parse failed: {err}"))?;
    let field = parsed.fields.first().context("no fields")?;
    Ok(field_tokens(field, &quote! { ::flagdoc }))
}

fn impls(tokens: TokenStream) -> Result<Vec<ItemImpl>> {
    let file: syn::File = syn::parse2(tokens).context("generated code should parse")?;
    file.items
        .into_iter()
        .map(|item| match item {
            syn::Item::Impl(item_impl) => Ok(item_impl),
            other => Err(anyhow!("unexpected item {}", quote! { #other })),
        })
        .collect()
}

fn trait_name(item: &ItemImpl) -> Option<String> {
    item.trait_
        .as_ref()
        .and_then(|(_, path, _)| path.segments.last())
        .map(|segment| segment.ident.to_string())
}

#[rstest]
fn both_traits_are_implemented() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Ring {
            store: String,
        }
    };
    let items = impls(expand(&input)?)?;
    let names: Vec<Option<String>> = items.iter().map(trait_name).collect();
    ensure!(
        names == [Some("ConfigSchema".to_owned()), Some("Describe".to_owned())],
        "unexpected impls {names:?}"
    );
    ensure!(
        items.iter().all(|item| item.generics.where_clause.is_none()),
        "non-generic structs need no where clause"
    );
    Ok(())
}

#[rstest]
fn type_parameters_are_bounded() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Wrapper<T> {
            inner: T,
        }
    };
    let items = impls(expand(&input)?)?;
    let first = items.first().context("no impls generated")?;
    let clause = first
        .generics
        .where_clause
        .as_ref()
        .context("generic impl should carry a where clause")?;
    let expected: syn::WherePredicate = parse_quote!(T: 'static + ::flagdoc::Describe);
    ensure!(
        clause.predicates.iter().any(|predicate| *predicate == expected),
        "missing bound in {}",
        quote! { #clause }
    );
    Ok(())
}

#[rstest]
fn crate_override_changes_generated_paths() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[flagdoc(crate = "docs")]
        struct Ring {
            store: String,
        }
    };
    let items = impls(expand(&input)?)?;
    let first = items.first().context("no impls generated")?;
    let expected: syn::Path = parse_quote!(docs::ConfigSchema);
    ensure!(
        first.trait_.as_ref().map(|(_, path, _)| path) == Some(&expected),
        "trait path should use the aliased crate"
    );
    Ok(())
}

#[rstest]
#[case::plain(
    parse_quote! { struct C { port: u16 } },
    quote! { ::flagdoc::FieldSchema::new("port", "port", <u16 as ::flagdoc::Describe>::shape()) },
)]
#[case::documented(
    parse_quote! { struct C {
        /// Port to listen on.
        #[flagdoc(required, category = "advanced")]
        port: u16,
    } },
    quote! {
        ::flagdoc::FieldSchema::new("port", "port", <u16 as ::flagdoc::Describe>::shape())
            .with_doc("Port to listen on.")
            .with_category(::flagdoc::FieldCategory::Advanced)
            .required()
    },
)]
#[case::hidden(
    parse_quote! { struct C { #[serde(skip)] runtime: Handle } },
    quote! { ::flagdoc::FieldSchema::new("runtime", "runtime", ::flagdoc::Shape::opaque()).hidden() },
)]
#[case::deprecated_overrides(
    parse_quote! { struct C {
        #[flagdoc(deprecated, description = "Old.", default = "1", type = "int")]
        legacy: u8,
    } },
    quote! {
        ::flagdoc::FieldSchema::new("legacy", "legacy", ::flagdoc::Shape::opaque())
            .with_description("Old.")
            .with_default("1")
            .with_type_name("int")
            .deprecated()
    },
)]
#[case::inline_renamed(
    parse_quote! { struct C { #[serde(flatten, rename = "shared")] common: Common } },
    quote! {
        ::flagdoc::FieldSchema::new("common", "shared", <Common as ::flagdoc::Describe>::shape())
            .inline()
    },
)]
fn field_tokens_match(#[case] input: DeriveInput, #[case] expected: TokenStream) -> Result<()> {
    let tokens = field_of(&input)?;
    ensure!(
        tokens.to_string() == expected.to_string(),
        "generated tokens differ: {tokens} != {expected}"
    );
    Ok(())
}
