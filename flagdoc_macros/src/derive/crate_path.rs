//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[flagdoc(crate = "...")]` attribute value into the
//! path generated code uses in place of `::flagdoc`.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `::flagdoc` when no override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::flagdoc }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for crate path resolution with default and custom paths.

    use super::*;
    use anyhow::{Context, Result, ensure};
    use rstest::rstest;

    #[rstest]
    #[case::default(None, ":: flagdoc")]
    #[case::custom(Some("docs"), "docs")]
    #[case::nested(Some("tools::flagdoc"), "tools :: flagdoc")]
    fn resolve_produces_expected_tokens(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let parsed = input
            .map(syn::parse_str::<syn::Path>)
            .transpose()
            .context("valid path")?;
        let tokens = resolve(parsed.as_ref());
        ensure!(tokens.to_string() == expected, "got {tokens}");
        Ok(())
    }
}
