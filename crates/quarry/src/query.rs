//! Query compilation and execution.
//!
//! A [`Query`] is compiled once from [`QueryParams`] against the schema of a
//! record type, then applied to any [`Queryable`] of that type.

use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::Result;
use crate::options::Options;
use crate::ordering::{parse_sort, SortKey};
use crate::page::{Page, PageWindow};
use crate::params::QueryParams;
use crate::parse::parse_filter_with;
use crate::predicate::{fold, Predicate};
use crate::queryable::{InMemory, Queryable};
use crate::traits::Record;

/// A compiled filter, sort and page window for records of type `T`.
///
/// Compilation resolves every field and coerces every literal, so a query
/// that compiles never fails when applied.
///
/// # Example
///
/// ```
/// use quarry::{Query, QueryParams};
/// # use quarry::{FieldKind, LazySchema, Number, NumberKind, Record, Schema, Value};
/// # struct Task { priority: i64 }
/// # static TASK: LazySchema = LazySchema::new(|| {
/// #     Schema::new("Task").field("priority", FieldKind::Number(NumberKind::Int))
/// # });
/// # impl Record for Task {
/// #     fn schema() -> &'static Schema { &TASK }
/// #     fn field_value(&self, field: &str) -> Value<'_> {
/// #         match field {
/// #             "priority" => Value::Number(Number::from(self.priority)),
/// #             _ => Value::None,
/// #         }
/// #     }
/// # }
///
/// let tasks: Vec<Task> = (1..=10).map(|priority| Task { priority }).collect();
///
/// let params = QueryParams::new()
///     .filter("priority gt 3")
///     .sort("priority desc")
///     .take("2");
/// let query = Query::<Task>::compile(&params).unwrap();
///
/// let page = query.run(&tasks);
/// assert_eq!(page.count, 7);
/// let top: Vec<i64> = page.result.into_iter().map(|t| t.priority).collect();
/// assert_eq!(top, [10, 9]);
/// ```
pub struct Query<T> {
    filter: Predicate,
    sort: Vec<SortKey>,
    window: PageWindow,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Query<T> {
    /// Compiles parameters with default [`Options`].
    pub fn compile(params: &QueryParams) -> Result<Self> {
        Self::compile_with(params, &Options::default())
    }

    /// Compiles parameters against `T`'s schema.
    ///
    /// Fails on the first unknown field, invalid literal, unsupported
    /// operator or malformed text. Skip and take never fail.
    pub fn compile_with(params: &QueryParams, options: &Options) -> Result<Self> {
        let schema = T::schema();
        let filter = fold(parse_filter_with(schema, params.filter_text(), options)?);
        let sort = parse_sort(schema, params.sort_text())?;
        let window = PageWindow::parse(
            params.skip.as_deref(),
            params.take.as_deref(),
            options.max_take,
        );

        debug!(
            record = schema.name(),
            %filter,
            sort = sort.len(),
            skip = ?window.skip,
            take = ?window.take,
            "compiled query"
        );

        Ok(Query {
            filter,
            sort,
            window,
            _record: PhantomData,
        })
    }

    /// Returns `true` if the record passes the filter.
    pub fn matches(&self, record: &T) -> bool {
        self.filter.matches(record)
    }

    /// Applies the query: filter, count, sort, skip, take.
    ///
    /// The count is taken after filtering and before paging. With an empty
    /// filter the source is not filtered at all.
    pub fn apply<Q>(&self, source: Q) -> Page<Q>
    where
        Q: Queryable<Item = T>,
    {
        let filtered = if self.filter.is_all() {
            source
        } else {
            trace!(filter = %self.filter, "filtering");
            source.filter(&self.filter)
        };
        let count = filtered.count();

        let mut result = filtered;
        for key in &self.sort {
            trace!(%key, "sorting");
            result = result.order_by(key);
        }
        if let Some(n) = self.window.skip {
            trace!(n, "skipping");
            result = result.skip(n);
        }
        if let Some(n) = self.window.take {
            trace!(n, "taking");
            result = result.take(n);
        }

        Page { count, result }
    }

    /// Applies the query to a slice.
    pub fn run<'a>(&self, items: &'a [T]) -> Page<InMemory<'a, T>> {
        self.apply(InMemory::new(items))
    }

    /// Counts the records in `items` that pass the filter.
    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }
}

impl<T> Query<T> {
    /// The folded filter predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.filter
    }

    /// Sort keys in declared order.
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Returns `true` if the query has no filter, sort or bounds.
    pub fn is_identity(&self) -> bool {
        self.filter.is_all() && self.sort.is_empty() && self.window.is_unbounded()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            window: self.window,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::schema::{FieldKind, LazySchema, NumberKind, Schema};
    use crate::value::{Number, Value};

    #[derive(Debug)]
    struct Pair {
        a: i64,
        b: i64,
    }

    static PAIR: LazySchema = LazySchema::new(|| {
        Schema::new("Pair")
            .field("a", FieldKind::Number(NumberKind::Int))
            .field("b", FieldKind::Number(NumberKind::Int))
    });

    impl Record for Pair {
        fn schema() -> &'static Schema {
            &PAIR
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "a" => Value::Number(Number::from(self.a)),
                "b" => Value::Number(Number::from(self.b)),
                _ => Value::None,
            }
        }
    }

    fn pairs() -> Vec<Pair> {
        vec![
            Pair { a: 1, b: 2 },
            Pair { a: 1, b: 1 },
            Pair { a: 2, b: 5 },
        ]
    }

    fn run(params: &QueryParams) -> (usize, Vec<(i64, i64)>) {
        let items = pairs();
        let page = Query::<Pair>::compile(params).unwrap().run(&items);
        let result = page.result.into_iter().map(|p| (p.a, p.b)).collect();
        (page.count, result)
    }

    /// Records the operations a query performs.
    #[derive(Default)]
    struct Spy {
        ops: Vec<&'static str>,
        len: usize,
    }

    impl Queryable for Spy {
        type Item = Pair;

        fn filter(mut self, _: &Predicate) -> Self {
            self.ops.push("filter");
            self
        }

        fn order_by(mut self, _: &SortKey) -> Self {
            self.ops.push("order_by");
            self
        }

        fn skip(mut self, _: usize) -> Self {
            self.ops.push("skip");
            self
        }

        fn take(mut self, _: usize) -> Self {
            self.ops.push("take");
            self
        }

        fn count(&self) -> usize {
            self.len
        }
    }

    #[test]
    fn empty_params_are_identity() {
        let query = Query::<Pair>::compile(&QueryParams::new()).unwrap();
        assert!(query.is_identity());
        assert_eq!(run(&QueryParams::new()), (3, vec![(1, 2), (1, 1), (2, 5)]));
    }

    #[test]
    fn last_sort_key_dominates() {
        let (_, result) = run(&QueryParams::new().sort("a asc, b desc"));
        assert_eq!(result, [(2, 5), (1, 2), (1, 1)]);

        let (_, result) = run(&QueryParams::new().sort("b desc, a asc"));
        assert_eq!(result, [(1, 2), (1, 1), (2, 5)]);
    }

    #[test]
    fn count_is_before_paging() {
        let params = QueryParams::new().filter("a eq 1").skip("1").take("5");
        assert_eq!(run(&params), (2, vec![(1, 1)]));
    }

    #[test]
    fn bad_bounds_are_ignored() {
        let params = QueryParams::new().skip("foo").take("-2");
        let query = Query::<Pair>::compile(&params).unwrap();
        assert_eq!(query.window(), PageWindow::default());
        assert_eq!(run(&params).1.len(), 3);
    }

    #[test]
    fn pipeline_order() {
        let params = QueryParams::new()
            .filter("a gt 0")
            .sort("a, b")
            .skip("1")
            .take("1");
        let query = Query::<Pair>::compile(&params).unwrap();
        let page = query.apply(Spy::default());
        assert_eq!(
            page.result.ops,
            ["filter", "order_by", "order_by", "skip", "take"]
        );
    }

    #[test]
    fn empty_filter_skips_filter_step() {
        let query = Query::<Pair>::compile(&QueryParams::new().take("1")).unwrap();
        let page = query.apply(Spy {
            len: 7,
            ..Spy::default()
        });
        assert_eq!(page.count, 7);
        assert_eq!(page.result.ops, ["take"]);
    }

    #[test]
    fn compile_errors_come_first() {
        let err = Query::<Pair>::compile(&QueryParams::new().filter("c eq 1")).unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { .. }));

        let err = Query::<Pair>::compile(&QueryParams::new().filter("a eq 1").sort("c"))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { .. }));
    }

    #[test]
    fn max_take_applies() {
        let options = Options::new().max_take(2);
        let query = Query::<Pair>::compile_with(&QueryParams::new(), &options).unwrap();
        assert_eq!(query.run(&pairs()).result.count(), 2);
    }

    #[test]
    fn count_helper() {
        let query = Query::<Pair>::compile(&QueryParams::new().filter("b lt 5")).unwrap();
        assert_eq!(query.count(&pairs()), 2);
    }
}
