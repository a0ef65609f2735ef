//! Parsed filter clauses.
//!
//! The parser turns filter text into a flat list of [`Token`]s: resolved and
//! coerced [`Clause`]s interleaved with the connectors that link them. The
//! list is folded into a single [`Predicate`] by [`fold`](crate::predicate::fold).

use crate::op::{Connector, Op};
use crate::predicate::{fold, Predicate};
use crate::schema::FieldPath;
use crate::value::Literal;

/// One parsed filter condition.
///
/// # Example
///
/// ```
/// use quarry::{ClauseValue, Op, Predicate, Token};
/// # use quarry::{FieldKind, LazySchema, Record, Schema, Value};
/// # struct Task;
/// # static TASK: LazySchema = LazySchema::new(|| Schema::new("Task").field("name", FieldKind::String));
/// # impl Record for Task {
/// #     fn schema() -> &'static Schema { &TASK }
/// #     fn field_value(&self, _: &str) -> Value<'_> { Value::None }
/// # }
///
/// let tokens = quarry::parse_filter(Task::schema(), "name contains 'bug'").unwrap();
/// let Token::Clause(clause) = &tokens[0] else { panic!() };
/// assert_eq!(clause.op, Op::Contains);
/// assert!(matches!(clause.value, ClauseValue::Single(_)));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The resolved field path.
    pub field: FieldPath,
    /// The operator.
    pub op: Op,
    /// The coerced operand.
    pub value: ClauseValue,
}

/// Operand of a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// A single literal, for comparison and substring operators.
    Single(Literal),
    /// The literal list of `in`/`nin`, in input order.
    List(Vec<Literal>),
    /// The nested filter of `.any`, scoped to the collection's element schema.
    Nested(Vec<Token>),
}

/// Element of a parsed filter.
#[derive(Debug, Clone)]
pub enum Token {
    Clause(Clause),
    Connector(Connector),
}

impl Clause {
    /// Compiles this clause into a predicate term.
    ///
    /// Negated operators compile to `Not` over their positive form, so each
    /// operator pair is an exact complement.
    pub fn into_predicate(self) -> Predicate {
        let (op, negate) = self.op.positive();
        let path = self.field;

        let positive = match (self.value, op) {
            (ClauseValue::Nested(tokens), _) => Predicate::Any {
                path,
                predicate: Box::new(fold(tokens)),
            },
            (ClauseValue::List(set), _) => Predicate::Member { path, set },
            (ClauseValue::Single(Literal::String(needle)), Op::Contains) => Predicate::Contains {
                path,
                needle: needle.to_lowercase(),
            },
            (ClauseValue::Single(literal), op) => Predicate::Compare { path, op, literal },
        };

        if negate {
            Predicate::Not(Box::new(positive))
        } else {
            positive
        }
    }
}
