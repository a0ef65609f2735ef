//! Tests for `#[derive(Record)]` and `#[derive(QueryEnum)]`.

use chrono::{DateTime, Utc};
use quarry::{
    FieldKind, Number, NumberKind, Query, QueryEnum, QueryParams, Record, Timestamp, Value,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, QueryEnum)]
enum Priority {
    Low,
    #[query(rename = "normal")]
    Medium,
    High,
}

#[derive(Record)]
struct Ticket {
    #[query(Id)]
    id: Uuid,
    #[query(String)]
    title: String,
    #[query(String, rename = "assignedTo")]
    assignee: Option<String>,
    #[query(Number)]
    points: u8,
    #[query(Number)]
    estimate: Option<f32>,
    #[query(Enum)]
    priority: Priority,
    #[query(ty = "bool")]
    done: bool,
    #[query(Timestamp)]
    opened: DateTime<Utc>,
    #[query(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
}

#[derive(Record)]
struct Category {
    #[query(String)]
    name: String,
    #[query(Collection)]
    children: Vec<Category>,
}

fn ticket() -> Ticket {
    Ticket {
        id: Uuid::from_u128(7),
        title: "Crash on start".into(),
        assignee: None,
        points: 3,
        estimate: Some(1.5),
        priority: Priority::Medium,
        done: false,
        opened: DateTime::from_timestamp_millis(86_400_000).unwrap(),
        cache: Vec::new(),
    }
}

fn leaf(name: &str) -> Category {
    Category {
        name: name.into(),
        children: Vec::new(),
    }
}

#[test]
fn field_constants() {
    assert_eq!(Ticket::TITLE, "title");
    assert_eq!(Ticket::ASSIGNED_TO, "assignedTo");
    assert_eq!(Ticket::OPENED, "opened");
}

#[test]
fn schema_lists_tagged_fields() {
    let schema = Ticket::schema();
    assert_eq!(schema.name(), "Ticket");

    let names: Vec<&str> = schema.fields().iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        [
            "id",
            "title",
            "assignedTo",
            "points",
            "estimate",
            "priority",
            "done",
            "opened"
        ]
    );
    assert!(schema.get("cache").is_none());
    assert!(schema.get("assignee").is_none());

    let kind = |name: &str| schema.get(name).unwrap().kind;
    assert!(matches!(kind("points"), FieldKind::Number(NumberKind::UInt)));
    assert!(matches!(kind("estimate"), FieldKind::Number(NumberKind::Float)));
    assert!(matches!(kind("done"), FieldKind::Bool));
    assert!(matches!(kind("opened"), FieldKind::Date));
    assert!(matches!(kind("id"), FieldKind::Id));
    match kind("priority") {
        FieldKind::Enum(variants) => assert_eq!(variants, ["Low", "normal", "High"]),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn field_values() {
    let t = ticket();
    assert_eq!(t.field_value("id"), Value::Id(Uuid::from_u128(7)));
    assert_eq!(t.field_value("title"), Value::String("Crash on start"));
    assert_eq!(t.field_value("assignedTo"), Value::None);
    assert_eq!(t.field_value("points"), Value::Number(Number::U64(3)));
    assert_eq!(t.field_value("estimate"), Value::Number(Number::F64(1.5)));
    assert_eq!(t.field_value("priority"), Value::Enum(1));
    assert_eq!(t.field_value("done"), Value::Bool(false));
    assert_eq!(t.field_value("opened"), Value::Date(Timestamp(86_400_000)));
    assert_eq!(t.field_value("cache"), Value::None);
}

#[test]
fn query_enum_variants() {
    assert_eq!(Priority::VARIANTS, ["Low", "normal", "High"]);
    assert_eq!(Priority::Low.ordinal(), 0);
    assert_eq!(Priority::High.ordinal(), 2);
}

#[test]
fn derived_records_compile_queries() {
    let tickets = vec![ticket()];
    let matches = |filter: &str| {
        let query = Query::<Ticket>::compile(&QueryParams::new().filter(filter)).unwrap();
        query.count(&tickets) == 1
    };

    assert!(matches("priority eq 'NORMAL'"));
    assert!(matches("assignedTo nq 'sam'"));
    assert!(matches("estimate lt 2 and points gte 3"));
    assert!(matches("opened eq 1970-01-02"));
    assert!(matches("done eq FALSE"));
    assert!(!matches("priority eq 'high' or title contains 'hang'"));
}

#[test]
fn recursive_collections() {
    let tree = vec![
        Category {
            name: "root".into(),
            children: vec![Category {
                name: "mid".into(),
                children: vec![leaf("deep")],
            }],
        },
        leaf("lonely"),
    ];

    let names = |filter: &str| -> Vec<String> {
        let query = Query::<Category>::compile(&QueryParams::new().filter(filter)).unwrap();
        query
            .run(&tree)
            .result
            .into_iter()
            .map(|c| c.name.clone())
            .collect()
    };

    assert_eq!(names("children.any(name eq 'mid')"), ["root"]);
    assert_eq!(names("children.any(children.any(name eq 'deep'))"), ["root"]);
    assert_eq!(names("children.any(children.name eq 'mid')"), ["root"]);
    assert!(names("children.any(name eq 'deep')").is_empty());
}
