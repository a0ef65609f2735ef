//! Skip/take bounds.

use serde::Serialize;

/// Optional skip and take bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageWindow {
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

impl PageWindow {
    /// Parses skip and take text.
    ///
    /// Never fails: absent, empty, negative or otherwise unparseable text
    /// leaves the bound unset. `max_take` caps `take` and stands in for it
    /// when unset.
    pub fn parse(skip: Option<&str>, take: Option<&str>, max_take: Option<usize>) -> Self {
        let take = match (bound(take), max_take) {
            (Some(take), Some(max)) => Some(take.min(max)),
            (take, max) => take.or(max),
        };
        PageWindow {
            skip: bound(skip),
            take,
        }
    }

    /// Returns `true` if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.skip.is_none() && self.take.is_none()
    }
}

/// Parses one bound as a non-negative decimal integer.
pub fn bound(text: Option<&str>) -> Option<usize> {
    text?.trim().parse().ok()
}

/// A page of results with the number of matches before paging.
///
/// Serializes as `{ "count": .., "result": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<R> {
    pub count: usize,
    pub result: R,
}

impl<R> Page<R> {
    /// Maps the result, keeping the count.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Page<U> {
        Page {
            count: self.count,
            result: f(self.result),
        }
    }
}
