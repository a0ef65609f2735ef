//! Filter parsing: raw tokens to resolved, coerced clauses.

use std::cell::Cell;

use tracing::trace;

use crate::clause::{Clause, ClauseValue, Token};
use crate::coerce::{coerce, coerce_list};
use crate::error::{QueryError, Result};
use crate::lexer::{tokenize, RawLiteral, RawToken};
use crate::op::Op;
use crate::options::Options;
use crate::schema::{FieldKind, FieldPath, Schema};

/// Parses filter text against a schema with default [`Options`].
pub fn parse_filter(schema: &Schema, text: &str) -> Result<Vec<Token>> {
    parse_filter_with(schema, text, &Options::default())
}

/// Parses filter text against a schema.
///
/// Returns clauses and connectors in input order. Every clause path is
/// resolved and every literal coerced; an empty result means "match all".
///
/// Filters with more than [`Options::max_clauses`] clauses, counting those
/// inside `.any` payloads, are rejected as malformed.
pub fn parse_filter_with(schema: &Schema, text: &str, options: &Options) -> Result<Vec<Token>> {
    let clauses = Cell::new(0);
    Parser {
        options,
        clauses: &clauses,
        depth: 0,
        scope: None,
    }
    .parse(schema, text, 0)
}

struct Parser<'o> {
    options: &'o Options,
    /// Clauses seen so far, shared with nested parsers.
    clauses: &'o Cell<usize>,
    depth: usize,
    /// Name of the collection whose `.any` payload is being parsed.
    scope: Option<&'static str>,
}

impl Parser<'_> {
    fn parse(&self, schema: &Schema, text: &str, offset: usize) -> Result<Vec<Token>> {
        let raw = tokenize(text, offset)?;
        let mut tokens = Vec::with_capacity(raw.len());
        // Position of the connector awaiting its right-hand clause.
        let mut dangling: Option<usize> = None;

        for token in raw {
            match token {
                RawToken::Connector {
                    connector,
                    position,
                } => {
                    if tokens.is_empty() {
                        return Err(QueryError::malformed(
                            position,
                            format!("filter cannot start with '{connector}'"),
                        ));
                    }
                    if dangling.is_some() {
                        return Err(QueryError::malformed(
                            position,
                            format!("'{connector}' cannot follow another connector"),
                        ));
                    }
                    dangling = Some(position);
                    tokens.push(Token::Connector(connector));
                }
                RawToken::Clause {
                    path,
                    op,
                    literal,
                    position,
                } => {
                    dangling = None;
                    self.count_clause(position)?;
                    let clause = self.clause(schema, path, op, literal, position)?;
                    trace!(field = %clause.field, op = %clause.op, "parsed clause");
                    tokens.push(Token::Clause(clause));
                }
            }
        }

        if let Some(position) = dangling {
            return Err(QueryError::malformed(position, "filter cannot end with a connector"));
        }
        Ok(tokens)
    }

    fn clause(
        &self,
        schema: &Schema,
        path: &str,
        op: Op,
        literal: RawLiteral<'_>,
        position: usize,
    ) -> Result<Clause> {
        let field = self.resolve(schema, path)?;
        let kind = field.kind();

        let value = match op {
            Op::Any => {
                let Some(element) = kind.element_schema() else {
                    return Err(QueryError::unsupported(
                        op.as_str(),
                        path,
                        format!("requires a collection field, found {}", kind.name()),
                    ));
                };
                if self.depth >= self.options.max_nesting {
                    return Err(QueryError::malformed(
                        position,
                        format!(
                            "'.any' nested deeper than {} levels",
                            self.options.max_nesting
                        ),
                    ));
                }
                let RawLiteral::List(payload, start) = literal else {
                    return Err(QueryError::malformed(
                        position,
                        "'.any' takes a parenthesized filter",
                    ));
                };
                let nested = Parser {
                    options: self.options,
                    clauses: self.clauses,
                    depth: self.depth + 1,
                    scope: field.segments().last().copied(),
                };
                ClauseValue::Nested(nested.parse(element, payload, start)?)
            }
            _ if !kind.is_scalar() => {
                return Err(QueryError::unsupported(
                    op.as_str(),
                    path,
                    format!("not valid for {} fields", kind.name()),
                ));
            }
            _ if op.is_membership_op() => ClauseValue::List(match literal {
                RawLiteral::List(payload, _) => coerce_list(path, kind, payload)?,
                RawLiteral::Quoted(text) | RawLiteral::Bare(text) => {
                    vec![coerce(path, kind, text)?]
                }
            }),
            _ => {
                if op.is_string_op() && !matches!(kind, FieldKind::String) {
                    return Err(QueryError::unsupported(
                        op.as_str(),
                        path,
                        format!("requires a string field, found {}", kind.name()),
                    ));
                }
                if op.is_ordering_op()
                    && !matches!(kind, FieldKind::Number(_) | FieldKind::Date)
                {
                    return Err(QueryError::unsupported(
                        op.as_str(),
                        path,
                        format!("requires a number or date field, found {}", kind.name()),
                    ));
                }
                ClauseValue::Single(coerce(path, kind, single(literal, position)?)?)
            }
        };

        Ok(Clause { field, op, value })
    }

    fn count_clause(&self, position: usize) -> Result<()> {
        let seen = self.clauses.get() + 1;
        if seen > self.options.max_clauses {
            return Err(QueryError::malformed(
                position,
                format!("more than {} clauses", self.options.max_clauses),
            ));
        }
        self.clauses.set(seen);
        Ok(())
    }

    /// Resolves a clause path, stripping a leading segment that names the
    /// enclosing collection inside an `.any` payload.
    fn resolve(&self, schema: &Schema, path: &str) -> Result<FieldPath> {
        if let Some(scope) = self.scope {
            if let Some((head, rest)) = path.split_once(['.', '/']) {
                if head.eq_ignore_ascii_case(scope) {
                    return schema.resolve(rest);
                }
            }
        }
        schema.resolve(path)
    }
}

fn single<'a>(literal: RawLiteral<'a>, position: usize) -> Result<&'a str> {
    match literal {
        RawLiteral::Quoted(text) | RawLiteral::Bare(text) => Ok(text),
        RawLiteral::List(..) => Err(QueryError::malformed(
            position,
            "a parenthesized list is not valid here",
        )),
    }
}
