//! Derive macros for quarry.
//!
//! - [`Record`] - Generate the static schema and field accessor of a record
//! - [`QueryEnum`] - Generate the variant table of a fieldless enum
//!
//! Both are re-exported by `quarry` under its default `derive` feature.

mod attrs;
mod query_enum;
mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `quarry::Record` for a struct with named fields.
///
/// Only fields carrying a kind attribute are queryable; the others are
/// invisible to query text.
///
/// # Field Attributes
///
/// | Attribute | Field type must implement |
/// |-----------|---------------------------|
/// | `String` | `AsRef<str>` |
/// | `Number` | `QueryNumber` (all primitive numbers) |
/// | `Bool` | is `bool` |
/// | `Date` | `QueryTimestamp` (`chrono` types, epoch millis) |
/// | `Enum` | `QueryEnum` |
/// | `Id` | is `uuid::Uuid` |
/// | `Record` | `Record` (a nested struct) |
/// | `Collection` | `QueryCollection` (e.g. `Vec` of records) |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom name in query text |
/// | `ty = "..."` | Give the kind as a string |
///
/// A field of type `Option<T>` is read as absent when `None`; the kind
/// applies to `T`.
///
/// # Generated Code
///
/// 1. Field name constants (e.g. `Order::CREATED_AT`)
/// 2. `Record::schema()`, backed by a lazily built static
/// 3. `Record::field_value()`
///
/// # Example
///
/// ```ignore
/// use quarry::Record;
///
/// #[derive(Record)]
/// struct Line {
///     #[query(String)]
///     sku: String,
///     #[query(Number)]
///     price: f64,
/// }
///
/// #[derive(Record)]
/// struct Order {
///     #[query(Id)]
///     id: uuid::Uuid,
///     #[query(Date, rename = "createdAt")]
///     created_at: chrono::DateTime<chrono::Utc>,
///     #[query(String)]
///     note: Option<String>,
///     #[query(Collection)]
///     items: Vec<Line>,
/// }
///
/// // "createdAt gt 2024-01-01 and items.any(price gt 10)"
/// ```
#[proc_macro_derive(Record, attributes(query))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `quarry::QueryEnum` for a fieldless enum.
///
/// Variant names are matched ignoring case; `#[query(rename = "...")]`
/// changes the name a variant is matched by.
///
/// ```ignore
/// use quarry::QueryEnum;
///
/// #[derive(Clone, Copy, QueryEnum)]
/// enum Status {
///     Open,
///     #[query(rename = "in_progress")]
///     InProgress,
///     Done,
/// }
///
/// assert_eq!(Status::VARIANTS, ["Open", "in_progress", "Done"]);
/// ```
#[proc_macro_derive(QueryEnum, attributes(query))]
pub fn query_enum_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    query_enum::query_enum_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
