//! Coercion of literal text into typed literals.
//!
//! The resolved [`FieldKind`] of a clause decides how its literal text is
//! parsed. Coercion happens entirely at compile time, so evaluation only
//! ever compares values of matching kinds.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{QueryError, Result};
use crate::schema::{FieldKind, NumberKind};
use crate::value::{Literal, Number, Timestamp};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerces unquoted literal text to the kind of `field`.
pub fn coerce(field: &str, kind: FieldKind, text: &str) -> Result<Literal> {
    let invalid = || QueryError::invalid_literal(field, text, kind.name());

    let literal = match kind {
        FieldKind::String => Literal::String(text.to_string()),
        FieldKind::Number(NumberKind::Int) => {
            Literal::Number(Number::I64(text.parse().map_err(|_| invalid())?))
        }
        FieldKind::Number(NumberKind::UInt) => {
            Literal::Number(Number::U64(text.parse().map_err(|_| invalid())?))
        }
        FieldKind::Number(NumberKind::Float) => {
            Literal::Number(Number::F64(text.parse().map_err(|_| invalid())?))
        }
        FieldKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Literal::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Literal::Bool(false)
            } else {
                return Err(invalid());
            }
        }
        FieldKind::Date => Literal::Date(parse_timestamp(text).ok_or_else(invalid)?),
        FieldKind::Enum(variants) => Literal::Enum(parse_variant(variants, text).ok_or_else(invalid)?),
        FieldKind::Id => Literal::Id(Uuid::parse_str(text).map_err(|_| invalid())?),
        FieldKind::Record(_) | FieldKind::Collection(_) => return Err(invalid()),
    };
    Ok(literal)
}

/// Coerces the payload of a parenthesized list, element by element.
///
/// `payload` is the text between the parentheses. Elements are separated by
/// commas outside single quotes; each is trimmed and unquoted before
/// coercion. Input order and duplicates are preserved.
pub fn coerce_list(field: &str, kind: FieldKind, payload: &str) -> Result<Vec<Literal>> {
    split_list(payload)
        .into_iter()
        .map(|element| coerce(field, kind, element))
        .collect()
}

/// Splits a list payload into unquoted elements.
///
/// Blank unquoted elements are dropped; `''` yields an empty string.
pub(crate) fn split_list(payload: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut in_quote = false;
    let mut start = 0;

    for (i, c) in payload.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                push_element(&mut elements, &payload[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_element(&mut elements, &payload[start..]);
    elements
}

fn push_element<'a>(elements: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    match unquote(trimmed) {
        Some(inner) => elements.push(inner),
        None if trimmed.is_empty() => {}
        None => elements.push(trimmed),
    }
}

/// Strips one pair of surrounding single quotes.
pub(crate) fn unquote(text: &str) -> Option<&str> {
    text.strip_prefix('\'')?.strip_suffix('\'')
}

/// Matches a variant name ignoring case, or an in-range ordinal.
fn parse_variant(variants: &[&str], text: &str) -> Option<u32> {
    if let Some(i) = variants.iter().position(|v| v.eq_ignore_ascii_case(text)) {
        return u32::try_from(i).ok();
    }
    text.parse::<u32>()
        .ok()
        .filter(|&ordinal| (ordinal as usize) < variants.len())
}

/// Parses date literal text.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]`,
/// `YYYY-MM-DD` and integer epoch milliseconds. Values without an offset are
/// taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Timestamp(dt.and_utc().timestamp_millis()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        return Some(Timestamp(midnight.and_utc().timestamp_millis()));
    }
    text.parse::<i64>().ok().map(Timestamp)
}
