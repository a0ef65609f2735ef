//! Implementation of `#[derive(QueryEnum)]` for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::parse_query_attrs;

pub fn query_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let enum_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data) = &input.data else {
        return Err(Error::new(
            input.span(),
            "QueryEnum can only be derived for enums",
        ));
    };

    let mut names = Vec::new();
    let mut arms = Vec::new();

    for (ordinal, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "QueryEnum variants cannot have fields",
            ));
        }

        let attr = parse_query_attrs(&variant.attrs)?;
        if attr.skip || attr.kind.is_some() {
            return Err(Error::new(
                attr.span,
                "only `rename` is supported on enum variants",
            ));
        }

        let ident = &variant.ident;
        let ordinal = u32::try_from(ordinal)
            .map_err(|_| Error::new(variant.span(), "too many variants"))?;
        names.push(attr.rename.unwrap_or_else(|| ident.to_string()));
        arms.push(quote! { #enum_name::#ident => #ordinal, });
    }

    Ok(quote! {
        impl #impl_generics ::quarry::QueryEnum for #enum_name #ty_generics #where_clause {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn ordinal(&self) -> u32 {
                match *self {
                    #(#arms)*
                }
            }
        }
    })
}
