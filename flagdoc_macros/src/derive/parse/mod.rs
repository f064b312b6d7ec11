//! Parsing utilities for the `ConfigSchema` derive macro.

use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Token, parenthesized};

mod doc_attrs;
mod literals;
mod serde_attrs;

use doc_attrs::doc_summary;
use literals::{lit_flag, lit_str};
use serde_attrs::{SerdeRenameAll, serde_field_flags, serde_field_rename, serde_rename_all};

/// Everything the generator needs to know about the derived struct.
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
    pub rename_all: Option<SerdeRenameAll>,
}

/// One named field with its resolved documentation metadata.
pub(crate) struct ParsedField {
    /// Field identifier without the raw prefix.
    pub ident: String,
    /// Serialized key.
    pub key: String,
    pub ty: syn::Type,
    pub doc: Option<String>,
    pub attrs: FieldAttrs,
}

/// Field-level attributes recognised by `#[derive(ConfigSchema)]`.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldAttrs {
    pub hidden: bool,
    pub deprecated: bool,
    pub inline: bool,
    pub required: bool,
    pub description: Option<String>,
    pub default: Option<String>,
    pub type_name: Option<String>,
    pub category: Option<Category>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Basic,
    Advanced,
    Experimental,
}

impl Category {
    pub(crate) fn parse(s: &str, span: proc_macro2::Span) -> syn::Result<Self> {
        match s {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            "experimental" => Ok(Self::Experimental),
            _ => Err(syn::Error::new(
                span,
                format!(
                    "unknown category '{s}'; expected one of \"basic\", \"advanced\", or \"experimental\""
                ),
            )),
        }
    }
}

/// Iterate all `#[flagdoc(...)]` attributes once and apply a callback.
fn parse_flagdoc<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("flagdoc")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Extracts `#[flagdoc(...)]` metadata applied to a struct.
///
/// Only `crate` is recognised; unknown keys are rejected.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs {
        rename_all: serde_rename_all(attrs)?,
        ..StructAttrs::default()
    };
    parse_flagdoc(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            return Ok(());
        }
        Err(meta.error("unsupported flagdoc struct attribute"))
    })?;
    Ok(out)
}

/// Parses field-level `#[flagdoc(...)]` and the serde switches that affect
/// documentation.
///
/// Unknown keys are rejected so misspelt attributes surface at compile time.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let serde = serde_field_flags(attrs)?;
    let mut out = FieldAttrs {
        hidden: serde.skip,
        inline: serde.flatten,
        ..FieldAttrs::default()
    };
    parse_flagdoc(attrs, |meta| apply_field_attr(meta, &mut out))?;
    Ok(out)
}

fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<()> {
    let key = meta
        .path
        .get_ident()
        .map(IdentExt::unraw)
        .map(|ident| ident.to_string())
        .unwrap_or_default();
    match key.as_str() {
        "hidden" => out.hidden = lit_flag(meta)?,
        "deprecated" => out.deprecated = lit_flag(meta)?,
        "inline" => out.inline = lit_flag(meta)?,
        "required" => out.required = lit_flag(meta)?,
        "description" => out.description = Some(lit_str(meta, "description")?.value()),
        "default" => out.default = Some(lit_str(meta, "default")?.value()),
        "type" => out.type_name = Some(lit_str(meta, "type")?.value()),
        "category" => {
            let s = lit_str(meta, "category")?;
            out.category = Some(Category::parse(&s.value(), s.span())?);
        }
        _ => return Err(meta.error("unsupported flagdoc field attribute")),
    }
    Ok(())
}

/// Gathers the struct identifier, generics, fields and attribute metadata in
/// one pass so expansion can fail fast with useful errors.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "ConfigSchema requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ConfigSchema can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(raw_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
        };
        let ident = raw_ident.unraw().to_string();
        let key = serde_field_rename(&field.attrs)?.unwrap_or_else(|| {
            attrs
                .rename_all
                .map_or_else(|| ident.clone(), |rule| rule.apply(&ident))
        });
        fields.push(ParsedField {
            key,
            ty: field.ty.clone(),
            doc: doc_summary(&field.attrs),
            attrs: parse_field_attrs(&field.attrs)?,
            ident,
        });
    }

    Ok(ParsedInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs,
        fields,
    })
}
