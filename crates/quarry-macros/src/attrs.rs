//! Attribute parsing for the `#[query(...)]` helper attribute.
//!
//! Used on struct fields by `#[derive(Record)]` and on enum variants by
//! `#[derive(QueryEnum)]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

const EXPECTED_KINDS: &str = "String, Number, Bool, Date, Enum, Id, Record, Collection";

/// The kind of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Date,
    Enum,
    Id,
    Record,
    Collection,
}

impl FieldKind {
    fn parse(name: &str) -> Option<Self> {
        let kind = match name {
            "String" | "string" => FieldKind::String,
            "Number" | "number" => FieldKind::Number,
            "Bool" | "bool" | "boolean" => FieldKind::Bool,
            "Date" | "date" | "Timestamp" | "timestamp" => FieldKind::Date,
            "Enum" | "enum" | "enumeration" => FieldKind::Enum,
            "Id" | "id" | "Uuid" | "uuid" => FieldKind::Id,
            "Record" | "record" => FieldKind::Record,
            "Collection" | "collection" => FieldKind::Collection,
            _ => return None,
        };
        Some(kind)
    }

    /// Parse a field kind from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse(&ident.to_string()).ok_or_else(|| {
            Error::new(
                ident.span(),
                format!("unknown query kind: '{ident}'. Expected one of: {EXPECTED_KINDS}"),
            )
        })
    }

    /// Parse a field kind from a string literal (`ty = "enum"`).
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::new(
                span,
                format!("unknown query kind: '{s}'. Expected one of: {EXPECTED_KINDS}"),
            )
        })
    }
}

/// Attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    pub kind: Option<FieldKind>,
    /// Exclude the field from the schema.
    pub skip: bool,
    /// Name used in query text (default: the Rust name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected a query kind ({EXPECTED_KINDS}) or skip"),
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(nv.value.span(), "expected a string literal"));
                    };
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(s.value());
                    } else if nv.path.is_ident("ty") {
                        attr.kind = Some(FieldKind::from_str(&s.value(), s.span())?);
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown query attribute. Expected: {EXPECTED_KINDS}, skip, rename = \"...\", or ty = \"...\""
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract the `#[query(...)]` attribute from a field's or variant's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}
