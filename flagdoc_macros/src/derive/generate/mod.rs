//! Token generation for `#[derive(ConfigSchema)]`.

#[cfg(test)]
mod tests;

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use super::parse::{Category, ParsedField, ParsedInput};

/// Generates the `ConfigSchema` and `Describe` impls for `input`.
pub(crate) fn generate_impls(input: &ParsedInput, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let mut generics = input.generics.clone();
    let type_params: Vec<syn::Ident> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    if !type_params.is_empty() {
        let predicates = &mut generics.make_where_clause().predicates;
        for param in &type_params {
            predicates.push(parse_quote!(#param: 'static + #krate::Describe));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let fields = input.fields.iter().map(|field| field_tokens(field, krate));

    quote! {
        impl #impl_generics #krate::ConfigSchema for #ident #ty_generics #where_clause {
            fn schema() -> #krate::StructSchema {
                #krate::StructSchema::new::<Self>(::std::vec![#(#fields),*])
            }
        }

        impl #impl_generics #krate::Describe for #ident #ty_generics #where_clause {
            fn shape() -> #krate::Shape {
                #krate::Shape::block::<Self>()
            }
        }
    }
}

fn field_tokens(field: &ParsedField, krate: &TokenStream) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let attrs = &field.attrs;
    let shape = if attrs.hidden || attrs.deprecated {
        quote! { #krate::Shape::opaque() }
    } else {
        let ty = &field.ty;
        quote! { <#ty as #krate::Describe>::shape() }
    };

    let mut builders = Vec::new();
    if let Some(doc) = &field.doc {
        builders.push(quote! { .with_doc(#doc) });
    }
    if let Some(description) = &attrs.description {
        builders.push(quote! { .with_description(#description) });
    }
    if let Some(default) = &attrs.default {
        builders.push(quote! { .with_default(#default) });
    }
    if let Some(type_name) = &attrs.type_name {
        builders.push(quote! { .with_type_name(#type_name) });
    }
    if let Some(category) = attrs.category {
        let variant = match category {
            Category::Basic => quote! { Basic },
            Category::Advanced => quote! { Advanced },
            Category::Experimental => quote! { Experimental },
        };
        builders.push(quote! { .with_category(#krate::FieldCategory::#variant) });
    }
    if attrs.required {
        builders.push(quote! { .required() });
    }
    if attrs.hidden {
        builders.push(quote! { .hidden() });
    } else if attrs.deprecated {
        builders.push(quote! { .deprecated() });
    }
    if attrs.inline {
        builders.push(quote! { .inline() });
    }

    quote! {
        #krate::FieldSchema::new(#ident, #key, #shape) #(#builders)*
    }
}
