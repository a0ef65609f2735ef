//! Error types for the quarry crate.

use thiserror::Error;

/// Errors that can occur while compiling a query.
///
/// Every variant is terminal: a query that fails to compile produces no
/// partial result and never touches the underlying [`Queryable`](crate::Queryable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A path segment does not name a field on the schema it was resolved against.
    #[error("unknown field '{segment}' in path '{path}'")]
    UnknownField { path: String, segment: String },

    /// Literal text does not parse to the type of the field it is compared with.
    #[error("invalid literal '{literal}' for field '{field}': expected {expected}")]
    InvalidLiteral {
        field: String,
        literal: String,
        expected: &'static str,
    },

    /// The operator is not in the closed operator set, or is not valid for the field's kind.
    #[error("operator '{op}' is not supported on field '{field}': {detail}")]
    UnsupportedOperator {
        op: String,
        field: String,
        detail: String,
    },

    /// The text does not match the filter or sort grammar.
    #[error("malformed query text at position {position}: {reason}")]
    MalformedFilterText { position: usize, reason: String },
}

impl QueryError {
    pub(crate) fn unknown_field(path: &str, segment: &str) -> Self {
        QueryError::UnknownField {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn invalid_literal(field: &str, literal: &str, expected: &'static str) -> Self {
        QueryError::InvalidLiteral {
            field: field.to_string(),
            literal: literal.to_string(),
            expected,
        }
    }

    pub(crate) fn unsupported(op: &str, field: &str, detail: impl Into<String>) -> Self {
        QueryError::UnsupportedOperator {
            op: op.to_string(),
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        QueryError::MalformedFilterText {
            position,
            reason: reason.into(),
        }
    }
}

/// Result type for quarry operations.
pub type Result<T> = std::result::Result<T, QueryError>;
