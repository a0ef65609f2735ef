//! Compiled filter predicates.
//!
//! A [`Predicate`] is a plain enum tree: hosts can evaluate it directly with
//! [`Predicate::matches`] or walk it to translate the filter for a store.

use std::cmp::Ordering;
use std::fmt;

use crate::clause::Token;
use crate::op::{Connector, Op};
use crate::schema::FieldPath;
use crate::traits::Record;
use crate::value::{Literal, Value};

/// A boolean condition over one record.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Matches every record.
    All,
    /// Field compared with a literal by `eq`, `gt` or `lt`.
    Compare {
        path: FieldPath,
        op: Op,
        literal: Literal,
    },
    /// Case-insensitive substring test. `needle` is stored lowercased.
    Contains { path: FieldPath, needle: String },
    /// Field equals some element of `set`.
    Member { path: FieldPath, set: Vec<Literal> },
    /// Some element of a nested collection matches `predicate`.
    Any {
        path: FieldPath,
        predicate: Box<Predicate>,
    },
    Not(Box<Predicate>),
    /// Every term holds. Empty holds for every record.
    And(Vec<Predicate>),
    /// Some term holds. Empty holds for no record.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Evaluates this predicate against a record.
    ///
    /// Absent fields and values of a different kind never satisfy a
    /// comparison, so `Not` of such a comparison holds.
    pub fn matches(&self, record: &dyn Record) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Compare { path, op, literal } => path
                .value_of(record)
                .compare_literal(literal)
                .is_some_and(|ordering| op.eval_ordering(ordering)),
            Predicate::Contains { path, needle } => path
                .value_of(record)
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(needle.as_str())),
            Predicate::Member { path, set } => {
                let value = path.value_of(record);
                set.iter()
                    .any(|literal| value.compare_literal(literal) == Some(Ordering::Equal))
            }
            Predicate::Any { path, predicate } => match path.value_of(record) {
                Value::Collection(elements) => elements.iter().any(|e| predicate.matches(*e)),
                _ => false,
            },
            Predicate::Not(inner) => !inner.matches(record),
            Predicate::And(terms) => terms.iter().all(|t| t.matches(record)),
            Predicate::Or(terms) => terms.iter().any(|t| t.matches(record)),
        }
    }

    /// Returns `true` for the identity predicate.
    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Joins with `other` by `and`, extending `self` if it is already an `And`.
    pub fn and(self, other: Predicate) -> Predicate {
        self.combine(Connector::And, other)
    }

    /// Joins with `other` by `or`, extending `self` if it is already an `Or`.
    pub fn or(self, other: Predicate) -> Predicate {
        self.combine(Connector::Or, other)
    }

    fn combine(self, connector: Connector, other: Predicate) -> Predicate {
        match (connector, self) {
            (Connector::And, Predicate::And(mut terms)) => {
                terms.push(other);
                Predicate::And(terms)
            }
            (Connector::Or, Predicate::Or(mut terms)) => {
                terms.push(other);
                Predicate::Or(terms)
            }
            (Connector::And, left) => Predicate::And(vec![left, other]),
            (Connector::Or, left) => Predicate::Or(vec![left, other]),
        }
    }
}

/// Folds parsed tokens into one predicate, strictly left to right.
///
/// The first clause starts the running predicate. Each later clause is
/// combined with it by the most recent connector, which stays in effect
/// until another replaces it and starts out as `and`. There is no
/// precedence: `a eq 1 or b eq 2 and c eq 3` is `(a or b) and c`.
///
/// Runs of one connector share a single n-ary node, so the tree only
/// deepens where the connector changes.
///
/// An empty token list folds to [`Predicate::All`].
pub fn fold(tokens: Vec<Token>) -> Predicate {
    let mut running: Option<Predicate> = None;
    let mut pending = Connector::default();

    for token in tokens {
        match token {
            Token::Connector(connector) => pending = connector,
            Token::Clause(clause) => {
                let term = clause.into_predicate();
                running = Some(match running {
                    None => term,
                    Some(left) => left.combine(pending, term),
                });
            }
        }
    }

    running.unwrap_or(Predicate::All)
}

struct LiteralText<'a>(&'a Literal);

impl fmt::Display for LiteralText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Literal::String(_) | Literal::Date(_) => write!(f, "'{}'", self.0),
            other => write!(f, "{other}"),
        }
    }
}

/// Readable rendering for logs and diagnostics, fully parenthesized.
///
/// Close to filter syntax but not parseable: negation is written as
/// `not (...)`, the identity as `true` and needles are not escaped.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => f.write_str("true"),
            Predicate::Compare { path, op, literal } => {
                write!(f, "{path} {op} {}", LiteralText(literal))
            }
            Predicate::Contains { path, needle } => write!(f, "{path} contains '{needle}'"),
            Predicate::Member { path, set } => {
                write!(f, "{path} in (")?;
                for (i, literal) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", LiteralText(literal))?;
                }
                f.write_str(")")
            }
            Predicate::Any { path, predicate } => match predicate.as_ref() {
                Predicate::All => write!(f, "{path}.any()"),
                inner => write!(f, "{path}.any({inner})"),
            },
            Predicate::Not(inner) => write!(f, "not ({inner})"),
            Predicate::And(terms) => write_terms(f, terms, "and", "true"),
            Predicate::Or(terms) => write_terms(f, terms, "or", "false"),
        }
    }
}

fn write_terms(
    f: &mut fmt::Formatter<'_>,
    terms: &[Predicate],
    connector: &str,
    empty: &str,
) -> fmt::Result {
    if terms.is_empty() {
        return f.write_str(empty);
    }
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, " {connector} ")?;
        }
        write!(f, "{term}")?;
    }
    f.write_str(")")
}
