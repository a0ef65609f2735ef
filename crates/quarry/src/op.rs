//! Filter operators and connectors.
//!
//! [`Op`] is the closed set of clause operators understood by the filter
//! grammar. [`Connector`] is the `and`/`or` token that links two clauses in
//! the left-to-right fold.

use std::cmp::Ordering;

/// Comparison operator for a filter clause.
///
/// Operators come in complementary pairs (`eq`/`nq`, `gt`/`lte`, `lt`/`gte`,
/// `in`/`nin`, `contains`/`ncontains`) plus the collection operator `.any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal.
    Eq,
    /// Not equal.
    Nq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-insensitive substring match. String fields only.
    Contains,
    /// Negated `Contains`.
    NContains,
    /// Membership in a parenthesized literal list.
    In,
    /// Negated `In`.
    Nin,
    /// Some element of a nested collection satisfies a nested filter.
    Any,
}

impl Op {
    /// Parses an operator token, ignoring ASCII case.
    ///
    /// The collection operator is only recognized in its `.any` spelling.
    pub fn parse(token: &str) -> Option<Op> {
        let op = match token.to_ascii_lowercase().as_str() {
            "eq" => Op::Eq,
            "nq" => Op::Nq,
            "gt" => Op::Gt,
            "gte" => Op::Gte,
            "lt" => Op::Lt,
            "lte" => Op::Lte,
            "contains" => Op::Contains,
            "ncontains" => Op::NContains,
            "in" => Op::In,
            "nin" => Op::Nin,
            ".any" => Op::Any,
            _ => return None,
        };
        Some(op)
    }

    /// Returns `true` for operators that order their operands.
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` for the substring operators.
    pub fn is_string_op(self) -> bool {
        matches!(self, Op::Contains | Op::NContains)
    }

    /// Returns `true` for the list membership operators.
    pub fn is_membership_op(self) -> bool {
        matches!(self, Op::In | Op::Nin)
    }

    /// Splits a negated operator into its positive form.
    ///
    /// Returns the positive operator and whether the result must be negated.
    /// `lte` is the complement of `gt` and `gte` the complement of `lt`.
    pub fn positive(self) -> (Op, bool) {
        match self {
            Op::Nq => (Op::Eq, true),
            Op::Lte => (Op::Gt, true),
            Op::Gte => (Op::Lt, true),
            Op::NContains => (Op::Contains, true),
            Op::Nin => (Op::In, true),
            other => (other, false),
        }
    }

    /// Evaluates a comparison given the ordering of field value to literal.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Nq => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the filter-text spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Nq => "nq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Contains => "contains",
            Op::NContains => "ncontains",
            Op::In => "in",
            Op::Nin => "nin",
            Op::Any => ".any",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean connector between two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connector {
    /// Logical AND. Also the connector in effect before any connector token.
    #[default]
    And,
    /// Logical OR.
    Or,
}

impl Connector {
    /// Parses a connector word, ignoring ASCII case.
    pub fn parse(token: &str) -> Option<Connector> {
        if token.eq_ignore_ascii_case("and") {
            Some(Connector::And)
        } else if token.eq_ignore_ascii_case("or") {
            Some(Connector::Or)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
