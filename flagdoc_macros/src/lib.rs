//! Procedural macros for `flagdoc`.
//!
//! [`ConfigSchema`](macro@ConfigSchema) implements `flagdoc::ConfigSchema`
//! and `flagdoc::Describe` for a struct with named fields, recording each
//! field's identifier, serialized key, doc comment and shape in declaration
//! order.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `flagdoc::ConfigSchema`.
///
/// Field attributes under `#[flagdoc(...)]`:
///
/// - `hidden`, `deprecated`: leave the field out of the documentation;
/// - `inline`: flatten a nested struct into the enclosing block;
/// - `required`: mark the field as mandatory;
/// - `description = "..."`, `default = "..."`, `type = "..."`: override the
///   documented text;
/// - `category = "basic" | "advanced" | "experimental"`.
///
/// `#[serde(rename)]`, `#[serde(rename_all)]`, `#[serde(skip)]` and
/// `#[serde(flatten)]` are honoured. `#[flagdoc(crate = "path")]` on the
/// struct changes the path generated code uses to reach `flagdoc`.
#[proc_macro_derive(ConfigSchema, attributes(flagdoc))]
pub fn derive_config_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
