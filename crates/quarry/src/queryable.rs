//! The sequence abstraction a compiled query runs against.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::ordering::SortKey;
use crate::predicate::Predicate;
use crate::traits::Record;

/// A sequence of records that a [`Query`](crate::Query) can transform.
///
/// Each operation consumes the sequence and returns the transformed one.
/// Implementations backed by a store may translate the predicate and keys
/// instead of evaluating them in memory.
pub trait Queryable: Sized {
    type Item: Record;

    /// Keeps the records matching `predicate`.
    fn filter(self, predicate: &Predicate) -> Self;

    /// Stable sort by `key`.
    fn order_by(self, key: &SortKey) -> Self;

    fn skip(self, n: usize) -> Self;

    fn take(self, n: usize) -> Self;

    /// Number of records currently in the sequence.
    fn count(&self) -> usize;
}

/// In-memory [`Queryable`] over borrowed records.
///
/// # Example
///
/// ```
/// use quarry::{InMemory, Queryable};
/// # use quarry::{FieldKind, LazySchema, Record, Schema, Value};
/// # struct Task;
/// # static TASK: LazySchema = LazySchema::new(|| Schema::new("Task"));
/// # impl Record for Task {
/// #     fn schema() -> &'static Schema { &TASK }
/// #     fn field_value(&self, _: &str) -> Value<'_> { Value::None }
/// # }
///
/// let tasks = [Task, Task, Task];
/// let page = InMemory::new(&tasks).skip(1);
/// assert_eq!(page.count(), 2);
/// ```
#[derive(Debug)]
pub struct InMemory<'a, T> {
    items: Vec<&'a T>,
}

impl<'a, T> InMemory<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        InMemory {
            items: items.iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().copied()
    }

    pub fn into_vec(self) -> Vec<&'a T> {
        self.items
    }
}

impl<T> Clone for InMemory<'_, T> {
    fn clone(&self) -> Self {
        InMemory {
            items: self.items.clone(),
        }
    }
}

impl<'a, T> FromIterator<&'a T> for InMemory<'a, T> {
    fn from_iter<I: IntoIterator<Item = &'a T>>(iter: I) -> Self {
        InMemory {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for InMemory<'a, T> {
    type Item = &'a T;
    type IntoIter = std::vec::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Record> Queryable for InMemory<'_, T> {
    type Item = T;

    fn filter(mut self, predicate: &Predicate) -> Self {
        self.items.retain(|item| predicate.matches(*item));
        self
    }

    fn order_by(mut self, key: &SortKey) -> Self {
        self.items.sort_by(|a, b| key.compare(*a, *b));
        self
    }

    fn skip(mut self, n: usize) -> Self {
        self.items.drain(..n.min(self.items.len()));
        self
    }

    fn take(mut self, n: usize) -> Self {
        self.items.truncate(n);
        self
    }

    fn count(&self) -> usize {
        self.items.len()
    }
}

/// Serializes as a sequence of the records.
impl<T: Serialize> Serialize for InMemory<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
