//! Serde attribute parsing helpers.
//!
//! Documented keys follow the names serde uses for the same struct, so the
//! generated schema respects `#[serde(rename = "...")]` and
//! `#[serde(rename_all = "...")]`. Skipped and flattened fields map onto
//! hidden and inline fields.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

use super::discard_unknown;

/// Supported `#[serde(rename_all = "...")]` rules for struct fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!(
                    "unsupported serde rename_all value '{other}'; expected one of \
\"lowercase\", \"UPPERCASE\", \"PascalCase\", \"camelCase\", \"snake_case\", \
\"SCREAMING_SNAKE_CASE\", \"kebab-case\", or \"SCREAMING-KEBAB-CASE\""
                ),
            )),
        }
    }

    pub(crate) fn apply(self, field_name: &str) -> String {
        match self {
            Self::Lower => field_name.to_ascii_lowercase(),
            Self::Upper => field_name.to_ascii_uppercase(),
            Self::Pascal => field_name.to_upper_camel_case(),
            Self::Camel => field_name.to_lower_camel_case(),
            Self::Snake => field_name.to_snake_case(),
            Self::ScreamingSnake => field_name.to_shouty_snake_case(),
            Self::Kebab => field_name.to_kebab_case(),
            Self::ScreamingKebab => field_name.to_shouty_kebab_case(),
        }
    }
}

/// Serde field switches that change how a field is documented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SerdeFieldFlags {
    pub skip: bool,
    pub flatten: bool,
}

/// Parse `#[serde(rename_all = "...")]` from struct attributes.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<SerdeRenameAll>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?.parse::<LitStr>()?;
                    out = Some(SerdeRenameAll::parse(&value)?);
                    return Ok(());
                }
                return meta.parse_nested_meta(|nested| {
                    parse_serialize_rule(&nested, &mut out)
                });
            }
            discard_unknown(&meta)
        })?;
    }
    Ok(out)
}

/// Parse `#[serde(rename = "...")]` (and `rename(serialize = "...")`) from field attributes.
pub(crate) fn serde_field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return discard_unknown(&meta);
            }

            if meta.input.peek(Token![=]) {
                let value = meta.value()?.parse::<LitStr>()?;
                out = Some(value.value());
                return Ok(());
            }

            if !meta.input.peek(syn::token::Paren) {
                return Ok(());
            }

            meta.parse_nested_meta(|nested| parse_serde_rename_serialize(&nested, &mut out))
        })?;
    }
    Ok(out)
}

/// Parse `#[serde(skip)]`, `#[serde(skip_serializing)]` and
/// `#[serde(flatten)]` from field attributes.
pub(crate) fn serde_field_flags(attrs: &[Attribute]) -> syn::Result<SerdeFieldFlags> {
    let mut out = SerdeFieldFlags::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("flatten") {
                out.flatten = true;
                return Ok(());
            }
            discard_unknown(&meta)
        })?;
    }
    Ok(out)
}

fn parse_serde_rename_serialize(
    nested: &ParseNestedMeta,
    rename: &mut Option<String>,
) -> syn::Result<()> {
    if !nested.path.is_ident("serialize") {
        return discard_unknown(nested);
    }

    let value = nested.value()?.parse::<LitStr>()?;
    *rename = Some(value.value());
    Ok(())
}

fn parse_serialize_rule(
    nested: &ParseNestedMeta,
    rule: &mut Option<SerdeRenameAll>,
) -> syn::Result<()> {
    if !nested.path.is_ident("serialize") {
        return discard_unknown(nested);
    }

    let value = nested.value()?.parse::<LitStr>()?;
    *rule = Some(SerdeRenameAll::parse(&value)?);
    Ok(())
}
