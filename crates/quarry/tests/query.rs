//! End-to-end tests: parameters in, page out.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use quarry::{
    Options, Page, Predicate, Query, QueryEnum, QueryError, QueryParams, Queryable, Record,
    SortKey,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, QueryEnum)]
enum Status {
    Pending,
    Active,
    Closed,
}

#[derive(Debug, Record)]
struct Line {
    #[query(String)]
    sku: String,
    #[query(Number)]
    price: f64,
}

#[derive(Debug, Record)]
struct Customer {
    #[query(String)]
    name: String,
    #[query(String)]
    city: Option<String>,
}

#[derive(Debug, Record)]
struct Order {
    #[query(Id)]
    id: Uuid,
    #[query(Number)]
    number: u32,
    #[query(String)]
    title: String,
    #[query(Enum)]
    status: Status,
    #[query(Date, rename = "createdAt")]
    created_at: NaiveDate,
    #[query(Bool)]
    paid: bool,
    #[query(String)]
    tag: String,
    #[query(Record)]
    customer: Customer,
    #[query(Collection)]
    items: Vec<Line>,
    internal_note: String,
}

fn line(sku: &str, price: f64) -> Line {
    Line {
        sku: sku.into(),
        price,
    }
}

fn customer(name: &str, city: Option<&str>) -> Customer {
    Customer {
        name: name.into(),
        city: city.map(Into::into),
    }
}

#[allow(clippy::too_many_arguments)]
fn order(
    number: u32,
    title: &str,
    status: Status,
    created: (i32, u32, u32),
    paid: bool,
    tag: &str,
    customer: Customer,
    items: Vec<Line>,
) -> Order {
    Order {
        id: Uuid::from_u128(number.into()),
        number,
        title: title.into(),
        status,
        created_at: NaiveDate::from_ymd_opt(created.0, created.1, created.2).unwrap(),
        paid,
        tag: tag.into(),
        customer,
        items,
        internal_note: String::new(),
    }
}

fn orders() -> Vec<Order> {
    vec![
        order(
            1,
            "Fix login bug",
            Status::Active,
            (2024, 1, 10),
            true,
            "x",
            customer("Ann", Some("Oslo")),
            vec![line("A-1", 5.0), line("B-2", 12.5)],
        ),
        order(
            2,
            "Write docs",
            Status::Pending,
            (2024, 2, 1),
            false,
            "y",
            customer("Bob", None),
            vec![line("A-1", 3.0)],
        ),
        order(
            3,
            "Release 1.0",
            Status::Closed,
            (2023, 12, 24),
            true,
            "z",
            customer("Cy", Some("Rome")),
            vec![],
        ),
        order(
            4,
            "Bug triage",
            Status::Active,
            (2024, 3, 5),
            false,
            "x",
            customer("Ann", Some("Oslo")),
            vec![line("C-3", 20.0)],
        ),
    ]
}

fn numbers(params: &QueryParams) -> (usize, Vec<u32>) {
    let items = orders();
    let page = Query::<Order>::compile(params).unwrap().run(&items);
    (page.count, page.result.into_iter().map(|o| o.number).collect())
}

fn filtered(filter: &str) -> Vec<u32> {
    numbers(&QueryParams::new().filter(filter)).1
}

fn compile_err(params: QueryParams) -> QueryError {
    Query::<Order>::compile(&params).unwrap_err()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn empty_filter_returns_everything() {
    assert_eq!(numbers(&QueryParams::new()), (4, vec![1, 2, 3, 4]));
    assert_eq!(numbers(&QueryParams::new().filter("  ")), (4, vec![1, 2, 3, 4]));
}

#[test]
fn enum_and_bool_fields() {
    assert_eq!(filtered("status eq 'active' and paid eq false"), [4]);
    assert_eq!(filtered("status eq Closed"), [3]);
    assert_eq!(filtered("status eq 0"), [2]);
    assert_eq!(filtered("status in ('pending', 'CLOSED')"), [2, 3]);
}

#[test]
fn contains_ignores_case() {
    assert_eq!(filtered("title contains 'BUG'"), [1, 4]);
    assert_eq!(filtered("title ncontains 'bug'"), [2, 3]);
}

#[test]
fn nested_record_paths() {
    assert_eq!(filtered("customer.city eq 'Oslo'"), [1, 4]);
    assert_eq!(filtered("Customer/Name eq 'Bob'"), [2]);
    // An absent city is never equal, so its negation holds.
    assert_eq!(filtered("customer.city nq 'Oslo'"), [2, 3]);
}

#[test]
fn any_over_collection() {
    assert_eq!(filtered("items.any(price gt 10)"), [1, 4]);
    assert_eq!(filtered("items.any(items.sku eq 'A-1')"), [1, 2]);
    assert_eq!(filtered("items.any(sku eq 'A-1' and price lt 4)"), [2]);
    assert_eq!(filtered("items.any()"), [1, 2, 4]);
    assert_eq!(filtered("paid eq true and items.any(price gt 10)"), [1]);
}

#[test]
fn date_fields() {
    assert_eq!(filtered("createdAt gte 2024-01-01"), [1, 2, 4]);
    assert_eq!(filtered("createdAt lt '2024-01-10T00:00:01Z'"), [1, 3]);
    assert_eq!(filtered("createdat eq '2024-02-01 00:00:00'"), [2]);
}

#[test]
fn id_fields() {
    let id = Uuid::from_u128(3);
    assert_eq!(filtered(&format!("id eq {id}")), [3]);
    assert_eq!(filtered(&format!("id nin ('{id}')")), [1, 2, 4]);
}

#[test]
fn in_and_nin_partition() {
    assert_eq!(filtered("tag in ('x', 'y')"), [1, 2, 4]);
    assert_eq!(filtered("tag nin ('x', 'y')"), [3]);
}

#[test]
fn connectors_fold_left_to_right() {
    // ((closed or unpaid) and tag x), not (closed or (unpaid and tag x))
    assert_eq!(
        filtered("status eq 'closed' or paid eq false and tag eq 'x'"),
        [4]
    );
    assert_eq!(filtered("number eq 1 or number eq 2 number eq 3"), [1, 2, 3]);
}

#[test]
fn predicate_is_inspectable() {
    let params = QueryParams::new().filter("number gt 1 or title contains 'Bug'");
    let query = Query::<Order>::compile(&params).unwrap();
    assert_eq!(
        query.predicate().to_string(),
        "(number gt 1 or title contains 'bug')"
    );
    assert!(matches!(query.predicate(), Predicate::Or(..)));
}

// ============================================================================
// Sorting and paging
// ============================================================================

#[test]
fn last_sort_key_dominates() {
    let params = QueryParams::new().sort("number desc, customer.name asc");
    assert_eq!(numbers(&params).1, [4, 1, 2, 3]);
}

#[test]
fn sort_by_date_and_enum() {
    assert_eq!(numbers(&QueryParams::new().sort("createdAt")).1, [3, 1, 2, 4]);
    assert_eq!(numbers(&QueryParams::new().sort("status desc")).1, [3, 1, 4, 2]);
}

#[test]
fn absent_values_sort_last_ascending() {
    let params = QueryParams::new().sort("customer.city");
    assert_eq!(numbers(&params).1, [1, 4, 3, 2]);

    let params = QueryParams::new().sort("customer.city desc");
    assert_eq!(numbers(&params).1, [2, 3, 1, 4]);
}

#[test]
fn nan_sorts_after_numbers() {
    let lines: Vec<Line> = (0..300)
        .map(|i| {
            let price = if i % 3 == 0 { f64::NAN } else { f64::from((i * 37) % 101) };
            line(&i.to_string(), price)
        })
        .collect();

    for (sort, ascending) in [("price asc", true), ("price desc", false)] {
        let query = Query::<Line>::compile(&QueryParams::new().sort(sort)).unwrap();
        let prices: Vec<f64> = query.run(&lines).result.into_iter().map(|l| l.price).collect();

        let (numbers, nans) = if ascending {
            prices.split_at(200)
        } else {
            let (nans, numbers) = prices.split_at(100);
            (numbers, nans)
        };
        assert!(nans.iter().all(|p| p.is_nan()), "{sort}");
        assert!(numbers.iter().all(|p| !p.is_nan()), "{sort}");
        if ascending {
            assert!(numbers.windows(2).all(|w| w[0] <= w[1]), "{sort}");
        } else {
            assert!(numbers.windows(2).all(|w| w[0] >= w[1]), "{sort}");
        }
    }
}

#[test]
fn paging_counts_before_window() {
    let params = QueryParams::new().sort("number").skip("1").take("2");
    assert_eq!(numbers(&params), (4, vec![2, 3]));

    let params = QueryParams::new().filter("paid eq false").skip("foo").take("");
    assert_eq!(numbers(&params), (2, vec![2, 4]));
}

#[test]
fn max_take_limits_page() {
    let items = orders();
    let options = Options::new().max_take(3);
    let query = Query::<Order>::compile_with(&QueryParams::new().take("10"), &options).unwrap();
    let page = query.run(&items);
    assert_eq!(page.count, 4);
    assert_eq!(page.result.count(), 3);
}

// ============================================================================
// Parameters and output
// ============================================================================

#[test]
fn dollar_prefixed_pairs() {
    let params = QueryParams::from_pairs([
        ("$filter", "paid eq true"),
        ("$sort", "number desc"),
        ("$take", "1"),
    ]);
    assert_eq!(numbers(&params), (2, vec![3]));
}

#[test]
fn page_serializes_as_envelope() {
    let items = orders();
    let query = Query::<Order>::compile(&QueryParams::new().filter("tag eq 'x'")).unwrap();
    let page: Page<Vec<u32>> = query
        .run(&items)
        .map(|result| result.into_iter().map(|o| o.number).collect());

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json, serde_json::json!({ "count": 2, "result": [1, 4] }));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_fields() {
    let err = compile_err(QueryParams::new().filter("colour eq 'red'"));
    assert_eq!(
        err,
        QueryError::UnknownField {
            path: "colour".into(),
            segment: "colour".into(),
        }
    );

    let err = compile_err(QueryParams::new().filter("customer.zip eq 1"));
    assert!(matches!(err, QueryError::UnknownField { segment, .. } if segment == "zip"));

    // Untagged fields are not queryable.
    let err = compile_err(QueryParams::new().filter("internal_note eq 'x'"));
    assert!(matches!(err, QueryError::UnknownField { .. }));
}

#[test]
fn invalid_literals() {
    let err = compile_err(QueryParams::new().filter("number eq many"));
    assert_eq!(
        err.to_string(),
        "invalid literal 'many' for field 'number': expected number"
    );
    assert!(matches!(
        compile_err(QueryParams::new().filter("id eq 42")),
        QueryError::InvalidLiteral { .. }
    ));
    assert!(matches!(
        compile_err(QueryParams::new().filter("status eq 'archived'")),
        QueryError::InvalidLiteral { .. }
    ));
}

#[test]
fn unsupported_operators() {
    for filter in [
        "title gt 'a'",
        "number contains '1'",
        "customer eq 'Ann'",
        "items eq 1",
        "title.any(sku eq 'x')",
        "number like 1",
    ] {
        assert!(
            matches!(
                compile_err(QueryParams::new().filter(filter)),
                QueryError::UnsupportedOperator { .. }
            ),
            "{filter}"
        );
    }
    assert!(matches!(
        compile_err(QueryParams::new().sort("items")),
        QueryError::UnsupportedOperator { .. }
    ));
}

#[test]
fn malformed_text() {
    for filter in [
        "status eq 'active' and",
        "or paid eq true",
        "title eq 'open",
        "items.any(price gt 1",
        "number eq",
        "number = 1",
    ] {
        assert!(
            matches!(
                compile_err(QueryParams::new().filter(filter)),
                QueryError::MalformedFilterText { .. }
            ),
            "{filter}"
        );
    }
    assert!(matches!(
        compile_err(QueryParams::new().sort("number asc,")),
        QueryError::MalformedFilterText { .. }
    ));
}

#[test]
fn long_filters_are_bounded() {
    let items = orders();
    let text = vec!["number gt 0"; 10_000].join(" and ");

    assert!(matches!(
        compile_err(QueryParams::new().filter(text.as_str())),
        QueryError::MalformedFilterText { .. }
    ));

    let options = Options::new().max_clauses(10_000);
    let query = Query::<Order>::compile_with(&QueryParams::new().filter(text.as_str()), &options)
        .unwrap();
    assert!(query.predicate().to_string().len() > text.len());
    assert_eq!(query.run(&items).count, 4);
}

// ============================================================================
// Queryable boundary
// ============================================================================

/// A queryable that only records the operations applied to it.
#[derive(Debug)]
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Queryable for Recorder {
    type Item = Order;

    fn filter(self, predicate: &Predicate) -> Self {
        self.log.borrow_mut().push(format!("filter {predicate}"));
        self
    }

    fn order_by(self, key: &SortKey) -> Self {
        self.log.borrow_mut().push(format!("order_by {key}"));
        self
    }

    fn skip(self, n: usize) -> Self {
        self.log.borrow_mut().push(format!("skip {n}"));
        self
    }

    fn take(self, n: usize) -> Self {
        self.log.borrow_mut().push(format!("take {n}"));
        self
    }

    fn count(&self) -> usize {
        self.log.borrow_mut().push("count".into());
        0
    }
}

fn execute(params: &QueryParams, source: Recorder) -> quarry::Result<Page<Recorder>> {
    let query = Query::<Order>::compile(params)?;
    Ok(query.apply(source))
}

#[test]
fn operations_reach_the_queryable_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let params = QueryParams::new()
        .filter("paid eq true")
        .sort("number desc, title")
        .skip("5")
        .take("10");

    execute(&params, Recorder { log: log.clone() }).unwrap();
    assert_eq!(
        *log.borrow(),
        [
            "filter paid eq true",
            "count",
            "order_by number desc",
            "order_by title asc",
            "skip 5",
            "take 10",
        ]
    );
}

#[test]
fn failed_compile_touches_nothing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let params = QueryParams::new().filter("paid eq true and colour eq 'red'");

    let err = execute(&params, Recorder { log: log.clone() }).unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { .. }));
    assert!(log.borrow().is_empty());
}
