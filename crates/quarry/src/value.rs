//! Runtime value types.
//!
//! [`Value`] is the value of a field as read from a record at evaluation
//! time. [`Literal`] is the owned, typed value a filter literal coerces to.
//! Both share the [`Number`] and [`Timestamp`] representations so that a
//! field and a literal of the same kind always compare directly.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::traits::Record;

/// Runtime value of a record field, borrowed from the record.
///
/// Returned by [`Record::field_value`]. Nested records and collections are
/// exposed as trait objects so that dotted paths and `.any` can walk them.
#[derive(Clone)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Point in time.
    Date(Timestamp),
    /// Enum variant ordinal.
    Enum(u32),
    /// 128-bit unique identifier.
    Id(Uuid),
    /// A single nested record.
    Record(&'a dyn Record),
    /// A nested collection of records.
    Collection(Vec<&'a dyn Record>),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compares this field value against a literal of the same kind.
    ///
    /// Returns `None` when the kinds differ, when the field is absent, or when
    /// the comparison is undefined (NaN).
    pub fn compare_literal(&self, literal: &Literal) -> Option<Ordering> {
        match (self, literal) {
            (Value::String(a), Literal::String(b)) => Some((*a).cmp(b.as_str())),
            (Value::Number(a), Literal::Number(b)) => a.compare(*b),
            (Value::Bool(a), Literal::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Literal::Date(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Literal::Enum(b)) => Some(a.cmp(b)),
            (Value::Id(a), Literal::Id(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Date(t) => f.debug_tuple("Date").field(t).finish(),
            Value::Enum(d) => f.debug_tuple("Enum").field(d).finish(),
            Value::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
            Value::Collection(items) => write!(f, "Collection(len={})", items.len()),
            Value::None => f.write_str("None"),
        }
    }
}

/// Scalar values compare by content; records and collections never compare equal.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Id(a), Value::Id(b)) => a == b,
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to the appropriate common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Mixed signed/unsigned integers stay exact
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total order for sorting: NaN sorts after every other number.
    pub fn sort_cmp(self, other: Number) -> Ordering {
        self.compare(other).unwrap_or_else(|| {
            let a_nan = self.to_f64().is_nan();
            let b_nan = other.to_f64().is_nan();
            a_nan.cmp(&b_nan)
        })
    }
}

fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Converts to a `chrono` UTC datetime, if representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

/// Formats as RFC 3339 with millisecond precision, or as raw epoch
/// milliseconds when out of `chrono`'s range.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Typed literal produced by coercing filter text against a field kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(Number),
    Bool(bool),
    Date(Timestamp),
    /// Enum variant ordinal.
    Enum(u32),
    Id(Uuid),
}

/// Writes the literal in a form the coercer accepts back for the same kind.
///
/// Strings are written verbatim and enums as their ordinal.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(s),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Date(t) => write!(f, "{t}"),
            Literal::Enum(d) => write!(f, "{d}"),
            Literal::Id(id) => write!(f, "{}", id.hyphenated()),
        }
    }
}
