//! Implementation of `#[derive(Record)]`.
//!
//! Generates the static schema table, the field accessor and field name
//! constants for a struct with named fields.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use crate::attrs::{parse_query_attrs, FieldKind};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let schema_name = struct_name.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_constants = Vec::new();
    let mut schema_fields = Vec::new();
    let mut field_matches = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attr = parse_query_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }
        // Fields without a kind are not queryable.
        let Some(kind) = attr.kind else {
            continue;
        };

        let query_name = attr.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for query text.
            pub const #const_name: &'static str = #query_name;
        });

        let (ty, optional) = match option_inner(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };

        let kind_expr = kind_expr(kind, ty);
        schema_fields.push(quote! { .field(#query_name, #kind_expr) });

        let value = value_expr(kind);
        let access = if optional {
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => #value,
                    ::core::option::Option::None => ::quarry::Value::None,
                }
            }
        } else {
            quote! {{
                let v = &self.#field_name;
                #value
            }}
        };
        field_matches.push(quote! { #query_name => #access, });
    }

    Ok(quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::quarry::Record for #struct_name {
            fn schema() -> &'static ::quarry::Schema {
                static SCHEMA: ::quarry::LazySchema = ::quarry::LazySchema::new(|| {
                    ::quarry::Schema::new(#schema_name)
                        #(#schema_fields)*
                });
                &SCHEMA
            }

            fn field_value(&self, field: &str) -> ::quarry::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::quarry::Value::None,
                }
            }
        }
    })
}

/// Schema kind expression for a field of type `ty`.
fn kind_expr(kind: FieldKind, ty: &Type) -> TokenStream {
    match kind {
        FieldKind::String => quote! { ::quarry::FieldKind::String },
        FieldKind::Number => {
            quote! { ::quarry::FieldKind::Number(<#ty as ::quarry::QueryNumber>::KIND) }
        }
        FieldKind::Bool => quote! { ::quarry::FieldKind::Bool },
        FieldKind::Date => quote! { ::quarry::FieldKind::Date },
        FieldKind::Enum => {
            quote! { ::quarry::FieldKind::Enum(<#ty as ::quarry::QueryEnum>::VARIANTS) }
        }
        FieldKind::Id => quote! { ::quarry::FieldKind::Id },
        FieldKind::Record => {
            quote! { ::quarry::FieldKind::Record(<#ty as ::quarry::Record>::schema) }
        }
        FieldKind::Collection => quote! {
            ::quarry::FieldKind::Collection(
                <<#ty as ::quarry::QueryCollection>::Element as ::quarry::Record>::schema
            )
        },
    }
}

/// Value expression over a reference `v` to the field.
fn value_expr(kind: FieldKind) -> TokenStream {
    match kind {
        FieldKind::String => {
            quote! { ::quarry::Value::String(::core::convert::AsRef::<str>::as_ref(v)) }
        }
        FieldKind::Number => {
            quote! { ::quarry::Value::Number(::quarry::QueryNumber::to_number(*v)) }
        }
        FieldKind::Bool => quote! { ::quarry::Value::Bool(*v) },
        FieldKind::Date => {
            quote! { ::quarry::Value::Date(::quarry::QueryTimestamp::query_timestamp(v)) }
        }
        FieldKind::Enum => quote! { ::quarry::Value::Enum(::quarry::QueryEnum::ordinal(v)) },
        FieldKind::Id => quote! { ::quarry::Value::Id(*v) },
        FieldKind::Record => quote! { ::quarry::Value::Record(v) },
        FieldKind::Collection => {
            quote! { ::quarry::Value::Collection(::quarry::QueryCollection::query_elements(v)) }
        }
    }
}

/// Returns `T` for a field declared as `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
