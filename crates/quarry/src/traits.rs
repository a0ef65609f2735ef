//! Traits that connect host types to the query compiler.
//!
//! [`Record`] is the schema boundary: it exposes a static [`Schema`] and
//! reads field values by canonical name. It is normally derived with
//! `#[derive(Record)]`; the helper traits below classify field types for
//! the derive.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::schema::{NumberKind, Schema};
use crate::value::{Number, Timestamp, Value};

/// A record type that filters and sorts can be compiled against.
///
/// # Manual Implementation
///
/// ```
/// use quarry::{FieldKind, LazySchema, Number, NumberKind, Record, Schema, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// static TASK: LazySchema = LazySchema::new(|| {
///     Schema::new("Task")
///         .field("name", FieldKind::String)
///         .field("priority", FieldKind::Number(NumberKind::UInt))
/// });
///
/// impl Record for Task {
///     fn schema() -> &'static Schema {
///         &TASK
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "priority" => Value::Number(Number::from(self.priority)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the static schema of this type.
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Returns the value of a field.
    ///
    /// `field` is always a canonical name from [`Record::schema`]; unknown
    /// names should yield [`Value::None`].
    fn field_value(&self, field: &str) -> Value<'_>;
}

/// Numeric field types.
pub trait QueryNumber: Copy {
    /// Representation literals are coerced to.
    const KIND: NumberKind;

    fn to_number(self) -> Number;
}

macro_rules! query_number {
    ($kind:ident: $($t:ty),*) => {
        $(
            impl QueryNumber for $t {
                const KIND: NumberKind = NumberKind::$kind;

                fn to_number(self) -> Number {
                    Number::from(self)
                }
            }
        )*
    };
}

query_number!(Int: i8, i16, i32, i64, isize);
query_number!(UInt: u8, u16, u32, u64, usize);
query_number!(Float: f32, f64);

/// Enum field types.
///
/// Can be derived for fieldless enums with `#[derive(QueryEnum)]`.
///
/// ```
/// use quarry::QueryEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Active,
/// }
///
/// impl QueryEnum for Status {
///     const VARIANTS: &'static [&'static str] = &["Pending", "Active"];
///
///     fn ordinal(&self) -> u32 {
///         *self as u32
///     }
/// }
/// ```
pub trait QueryEnum {
    /// Variant names, indexed by ordinal. Literals match them ignoring case.
    const VARIANTS: &'static [&'static str];

    /// Returns the ordinal of this variant in [`QueryEnum::VARIANTS`].
    fn ordinal(&self) -> u32;
}

/// Date field types.
pub trait QueryTimestamp {
    fn query_timestamp(&self) -> Timestamp;
}

/// Epoch milliseconds.
impl QueryTimestamp for i64 {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl QueryTimestamp for Timestamp {
    fn query_timestamp(&self) -> Timestamp {
        *self
    }
}

impl QueryTimestamp for DateTime<Utc> {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp(self.timestamp_millis())
    }
}

/// Naive datetimes are taken to be UTC.
impl QueryTimestamp for NaiveDateTime {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp(self.and_utc().timestamp_millis())
    }
}

/// Dates are taken as midnight UTC.
impl QueryTimestamp for NaiveDate {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp(self.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis())
    }
}

/// Collection field types whose elements are records.
pub trait QueryCollection {
    type Element: Record;

    fn query_elements(&self) -> Vec<&dyn Record>;
}

impl<T: Record> QueryCollection for Vec<T> {
    type Element = T;

    fn query_elements(&self) -> Vec<&dyn Record> {
        self.iter().map(|e| e as &dyn Record).collect()
    }
}

impl<T: Record> QueryCollection for [T] {
    type Element = T;

    fn query_elements(&self) -> Vec<&dyn Record> {
        self.iter().map(|e| e as &dyn Record).collect()
    }
}

impl<T: Record> QueryCollection for Box<[T]> {
    type Element = T;

    fn query_elements(&self) -> Vec<&dyn Record> {
        self.iter().map(|e| e as &dyn Record).collect()
    }
}
