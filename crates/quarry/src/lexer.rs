//! Tokenizer for filter text.
//!
//! Splits filter text into clause tokens (`<path> <op> <literal>`) and
//! connector tokens (`and`/`or`). The lexer only checks the shape of each
//! token; connector placement, field resolution and literal coercion happen
//! in the parser.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::{QueryError, Result};
use crate::op::{Connector, Op};

static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*(?:[./][A-Za-z_]\w*)*").expect("valid regex"));
static OP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.?[A-Za-z]+").expect("valid regex"));
static BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.:+-]+").expect("valid regex"));

const ANY_SUFFIX: &str = ".any";

/// Literal text as written, before coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawLiteral<'a> {
    /// Contents of a single-quoted string.
    Quoted(&'a str),
    /// Contents of a parenthesized list, with the absolute position of the
    /// first character after `(`.
    List(&'a str, usize),
    /// A bare word or number.
    Bare(&'a str),
}

/// A lexical token with its absolute position in the filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken<'a> {
    Clause {
        path: &'a str,
        op: Op,
        literal: RawLiteral<'a>,
        position: usize,
    },
    Connector {
        connector: Connector,
        position: usize,
    },
}

/// Tokenizer over one filter string.
///
/// `offset` is added to every reported position so that nested `.any`
/// payloads report positions in the outermost text.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    offset: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str, offset: usize) -> Self {
        Self {
            input,
            pos: 0,
            offset,
            failed: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn malformed(&self, at: usize, reason: impl Into<String>) -> QueryError {
        QueryError::malformed(self.offset + at, reason)
    }

    fn next_token(&mut self) -> Result<Option<RawToken<'a>>> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let start = self.pos;
        let Some(word) = PATH_RE.find(self.rest()).map(|m| m.as_str()) else {
            return Err(self.malformed(start, format!("unexpected character '{c}'")));
        };
        self.pos += word.len();

        if let Some(connector) = Connector::parse(word) {
            return Ok(Some(RawToken::Connector {
                connector,
                position: self.offset + start,
            }));
        }

        let (path, op) = match self.fused_any(word) {
            Some(path) => (path, Op::Any),
            None => (word, self.operator(word)?),
        };

        let literal = self.literal(path, op)?;
        Ok(Some(RawToken::Clause {
            path,
            op,
            literal,
            position: self.offset + start,
        }))
    }

    /// Recognizes `items.any(` where the operator is fused to the path.
    fn fused_any(&self, word: &'a str) -> Option<&'a str> {
        let split = word.len().checked_sub(ANY_SUFFIX.len())?;
        if split == 0 || !word.is_char_boundary(split) {
            return None;
        }
        let (path, suffix) = word.split_at(split);
        let next = self.rest().trim_start().chars().next();
        (suffix.eq_ignore_ascii_case(ANY_SUFFIX) && next == Some('(')).then_some(path)
    }

    fn operator(&mut self, path: &str) -> Result<Op> {
        self.skip_whitespace();
        let at = self.pos;
        let Some(word) = OP_RE.find(self.rest()).map(|m| m.as_str()) else {
            return Err(self.malformed(at, format!("expected an operator after '{path}'")));
        };
        self.pos += word.len();
        Op::parse(word).ok_or_else(|| QueryError::unsupported(word, path, "unknown operator"))
    }

    fn literal(&mut self, path: &str, op: Op) -> Result<RawLiteral<'a>> {
        self.skip_whitespace();
        let at = self.pos;
        let literal = match self.peek() {
            Some('\'') => RawLiteral::Quoted(self.quoted()?),
            Some('(') => self.parenthesized()?,
            Some(_) => match BARE_RE.find(self.rest()).map(|m| m.as_str()) {
                Some(word) => {
                    self.pos += word.len();
                    RawLiteral::Bare(word)
                }
                None => return Err(self.malformed(at, format!("expected a literal after '{path} {op}'"))),
            },
            None => return Err(self.malformed(at, format!("expected a literal after '{path} {op}'"))),
        };

        match (op, literal) {
            (Op::Any, RawLiteral::List(..)) => {}
            (Op::Any, _) => {
                return Err(self.malformed(at, "'.any' takes a parenthesized filter"));
            }
            (Op::In | Op::Nin, _) | (_, RawLiteral::Quoted(_) | RawLiteral::Bare(_)) => {}
            (_, RawLiteral::List(..)) => {
                return Err(self.malformed(
                    at,
                    format!("a parenthesized list is not valid for '{op}'"),
                ));
            }
        }
        Ok(literal)
    }

    fn quoted(&mut self) -> Result<&'a str> {
        let open = self.pos;
        let body = &self.input[open + 1..];
        let Some(len) = body.find('\'') else {
            return Err(self.malformed(open, "unterminated quote"));
        };
        self.pos = open + 1 + len + 1;
        Ok(&body[..len])
    }

    fn parenthesized(&mut self) -> Result<RawLiteral<'a>> {
        let open = self.pos;
        let mut depth = 0usize;
        let mut in_quote = false;

        for (i, c) in self.rest().char_indices() {
            match c {
                '\'' => in_quote = !in_quote,
                '(' if !in_quote => depth += 1,
                ')' if !in_quote => {
                    depth -= 1;
                    if depth == 0 {
                        let close = open + i;
                        self.pos = close + 1;
                        return Ok(RawLiteral::List(
                            &self.input[open + 1..close],
                            self.offset + open + 1,
                        ));
                    }
                }
                _ => {}
            }
        }

        let reason = if in_quote {
            "unterminated quote"
        } else {
            "unterminated parenthesis"
        };
        Err(self.malformed(open, reason))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<RawToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => {
                trace!(?token, "lexed filter token");
                Some(Ok(token))
            }
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Tokenizes a complete filter string.
pub(crate) fn tokenize(input: &str, offset: usize) -> Result<Vec<RawToken<'_>>> {
    Lexer::new(input, offset).collect()
}
