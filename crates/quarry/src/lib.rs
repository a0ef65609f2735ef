//! Quarry - compact filter/sort/paging queries over schema-described records.
//!
//! Quarry compiles the four text parameters of a list request (`filter`,
//! `sort`, `skip`, `take`) into a [`Query`] for one record type, then applies
//! it to any [`Queryable`] sequence of those records. It supports:
//!
//! - Dotted field paths, resolved case-insensitively against a static [`Schema`]
//! - Typed literals: numbers, bools, strings, dates, enums and identifiers
//! - One `.any(...)` sub-filter per nested collection, nestable
//! - Multi-key sorting and skip/take paging, with a match count
//!
//! # Quick Start
//!
//! ```rust
//! use quarry::{Query, QueryEnum, QueryParams, Record};
//!
//! #[derive(Clone, Copy, QueryEnum)]
//! enum Status {
//!     Open,
//!     Closed,
//! }
//!
//! #[derive(Record)]
//! struct Task {
//!     #[query(String)]
//!     name: String,
//!     #[query(Number)]
//!     priority: i32,
//!     #[query(Enum)]
//!     status: Status,
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs".into(), priority: 3, status: Status::Open },
//!     Task { name: "Fix bug".into(), priority: 5, status: Status::Open },
//!     Task { name: "Old task".into(), priority: 1, status: Status::Closed },
//! ];
//!
//! let params = QueryParams::new()
//!     .filter("priority gte 3 and status eq 'open'")
//!     .sort("priority desc");
//! let query = Query::<Task>::compile(&params).unwrap();
//!
//! let page = query.run(&tasks);
//! assert_eq!(page.count, 2);
//! let names: Vec<_> = page.result.into_iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["Fix bug", "Write docs"]);
//! ```
//!
//! # Filter Grammar
//!
//! A filter is a sequence of `<path> <op> <literal>` clauses separated by
//! `and`/`or`:
//!
//! ```text
//! name contains 'bug' and priority gt 2 or items.any(price gte 10)
//! ```
//!
//! Clauses fold strictly left to right with no precedence, so the example
//! reads `((name and priority) or items)`. Negated operators are exact
//! complements of their positive forms.
//!
//! | Kind | Operators |
//! |------|-----------|
//! | String | `eq`, `nq`, `in`, `nin`, `contains`, `ncontains` |
//! | Number, Date | `eq`, `nq`, `in`, `nin`, `gt`, `gte`, `lt`, `lte` |
//! | Bool, Enum, Id | `eq`, `nq`, `in`, `nin` |
//! | Collection | `.any` |
//!
//! # Sort Order
//!
//! `sort` is a comma-separated list of `field [asc|desc]`. Keys are applied
//! as successive stable sorts, so the last key is the primary one.

mod clause;
mod coerce;
mod error;
mod lexer;
mod op;
mod options;
mod ordering;
mod page;
mod params;
mod parse;
mod predicate;
mod query;
mod queryable;
mod schema;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseValue, Token};
pub use coerce::{coerce, coerce_list, parse_timestamp};
pub use error::{QueryError, Result};
pub use op::{Connector, Op};
pub use options::Options;
pub use ordering::{compare_values, parse_sort, Dir, SortKey};
pub use page::{Page, PageWindow};
pub use params::QueryParams;
pub use parse::{parse_filter, parse_filter_with};
pub use predicate::{fold, Predicate};
pub use query::Query;
pub use queryable::{InMemory, Queryable};
pub use schema::{Field, FieldKind, FieldPath, LazySchema, NumberKind, Schema, SchemaFn};
pub use traits::{QueryCollection, QueryEnum, QueryNumber, QueryTimestamp, Record};
pub use value::{Literal, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use quarry_macros::{QueryEnum, Record};
