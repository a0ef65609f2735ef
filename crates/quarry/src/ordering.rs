//! Sort compilation.
//!
//! Provides [`Dir`] for sort direction and [`SortKey`] for field-based
//! ordering, and parses `field [direction]` lists with [`parse_sort`].

use std::cmp::Ordering;
use std::fmt;

use crate::error::{QueryError, Result};
use crate::schema::{FieldPath, Schema};
use crate::traits::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Parses a direction token.
    ///
    /// `asc` in any case is ascending; every other token is descending.
    pub fn parse(token: &str) -> Dir {
        if token.eq_ignore_ascii_case("asc") {
            Dir::Asc
        } else {
            Dir::Desc
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: a resolved field and a direction.
///
/// A query's keys are applied one after another as stable sorts, in the
/// order they were written. The **last** key therefore dominates and
/// earlier keys only break its ties: `a asc, b desc` orders by `b`
/// descending, then by `a` ascending.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub path: FieldPath,
    pub dir: Dir,
}

impl SortKey {
    /// Compares two records by this key.
    ///
    /// Values of mismatched kinds are treated as equal.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Ordering {
        let a = self.path.value_of(a);
        let b = self.path.value_of(b);
        compare_values(&a, &b).map_or(Ordering::Equal, |ordering| self.dir.apply(ordering))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.dir)
    }
}

/// Compares two values of the same kind, ascending.
///
/// NaN sorts after every number and absent values after everything else.
/// Returns `None` if the kinds don't match.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(a.sort_cmp(*b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Id(a), Value::Id(b)) => Some(a.cmp(b)),

        // None values sort last
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),

        _ => None,
    }
}

/// Parses sort text into keys, in declared order.
///
/// The text is a comma-separated list of `field [direction]` entries.
/// Empty text yields no keys.
pub fn parse_sort(schema: &Schema, text: &str) -> Result<Vec<SortKey>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut keys = Vec::new();
    let mut start = 0;
    for entry in text.split(',') {
        let position = start + (entry.len() - entry.trim_start().len());
        start += entry.len() + 1;

        let mut words = entry.split_whitespace();
        let Some(field) = words.next() else {
            return Err(QueryError::malformed(position, "empty sort entry"));
        };
        let dir = words.next().map_or(Dir::Asc, Dir::parse);
        if let Some(extra) = words.next() {
            return Err(QueryError::malformed(
                position,
                format!("unexpected '{extra}' after sort direction"),
            ));
        }

        let path = schema.resolve(field)?;
        if !path.kind().is_scalar() {
            return Err(QueryError::unsupported(
                "sort",
                field,
                format!("cannot sort by a {} field", path.kind().name()),
            ));
        }
        keys.push(SortKey { path, dir });
    }
    Ok(keys)
}
