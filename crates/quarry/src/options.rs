//! Compiler limits.

use serde::Deserialize;

/// Compiler limits.
///
/// Loadable from host configuration:
///
/// ```
/// let options: quarry::Options = serde_json::from_str(r#"{ "max_take": 100 }"#).unwrap();
/// assert_eq!(options.max_take, Some(100));
/// assert_eq!(options.max_nesting, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Maximum depth of nested `.any` filters.
    pub max_nesting: usize,
    /// Maximum number of clauses in one filter, nested ones included.
    pub max_clauses: usize,
    /// Upper bound on `take`; also applied when no `take` is given.
    pub max_take: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_nesting: 8,
            max_clauses: 512,
            max_take: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_nesting(mut self, depth: usize) -> Self {
        self.max_nesting = depth;
        self
    }

    pub fn max_clauses(mut self, clauses: usize) -> Self {
        self.max_clauses = clauses;
        self
    }

    pub fn max_take(mut self, take: usize) -> Self {
        self.max_take = Some(take);
        self
    }
}
