//! Expansion of `#[derive(ConfigSchema)]`.

mod crate_path;
mod generate;
mod parse;

use proc_macro2::TokenStream;

pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    let krate = crate_path::resolve(parsed.attrs.crate_path.as_ref());
    Ok(generate::generate_impls(&parsed, &krate))
}
