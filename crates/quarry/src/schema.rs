//! Static schema tables and field path resolution.
//!
//! A [`Schema`] lists the queryable fields of one record type together with
//! their [`FieldKind`]. Schemas are declared once, usually by
//! `#[derive(Record)]`, and looked up case-insensitively by the resolver.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{QueryError, Result};
use crate::traits::Record;
use crate::value::Value;

/// Returns the schema of a nested record type.
///
/// A function pointer rather than a reference so that schemas may refer to
/// each other (or to themselves) without initialization order concerns.
pub type SchemaFn = fn() -> &'static Schema;

/// Lazily built schema, suitable for a `static`.
pub type LazySchema = Lazy<Schema>;

/// Declared representation of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// Signed integer, coerced as `i64`.
    Int,
    /// Unsigned integer, coerced as `u64`.
    UInt,
    /// Floating point, coerced as `f64`.
    Float,
}

/// Kind of a schema field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    Number(NumberKind),
    Bool,
    String,
    Date,
    /// Enum with its variant names, indexed by ordinal.
    Enum(&'static [&'static str]),
    /// 128-bit unique identifier.
    Id,
    /// A single nested record; paths may descend into it.
    Record(SchemaFn),
    /// A nested collection of records; only `.any` applies.
    Collection(SchemaFn),
}

impl FieldKind {
    /// Returns the name of this kind, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Number(_) => "number",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Date => "date",
            FieldKind::Enum(_) => "enum",
            FieldKind::Id => "id",
            FieldKind::Record(_) => "record",
            FieldKind::Collection(_) => "collection",
        }
    }

    /// Returns `true` for kinds a literal can be coerced to.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldKind::Record(_) | FieldKind::Collection(_))
    }

    /// Returns the element schema of a collection field.
    pub fn element_schema(&self) -> Option<&'static Schema> {
        match self {
            FieldKind::Collection(schema) => Some(schema()),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Number(n) => f.debug_tuple("Number").field(n).finish(),
            FieldKind::Enum(variants) => f.debug_tuple("Enum").field(variants).finish(),
            FieldKind::Record(schema) => write!(f, "Record({})", schema().name()),
            FieldKind::Collection(schema) => write!(f, "Collection({})", schema().name()),
            other => f.write_str(other.name()),
        }
    }
}

/// A single field descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Canonical field name, as passed to [`Record::field_value`].
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Queryable fields of one record type.
///
/// # Example
///
/// ```
/// use quarry::{FieldKind, NumberKind, Schema};
///
/// let schema = Schema::new("Task")
///     .field("Name", FieldKind::String)
///     .field("Priority", FieldKind::Number(NumberKind::Int));
///
/// assert_eq!(schema.get("name").unwrap().name, "Name");
/// assert!(schema.get("owner").is_none());
/// ```
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema for the named record type.
    pub fn new(name: &'static str) -> Self {
        Schema {
            name,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds a field. A field whose name matches an existing one (ignoring
    /// case) replaces it.
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        let field = Field { name, kind };
        match self.index.get(&name.to_lowercase()) {
            Some(&i) => self.fields[i] = field,
            None => {
                self.index.insert(name.to_lowercase(), self.fields.len());
                self.fields.push(field);
            }
        }
        self
    }

    /// Returns the record type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(&name.to_lowercase()).map(|&i| &self.fields[i])
    }

    /// Resolves a dotted (or slash-separated) field path.
    ///
    /// Every segment but the last must name a [`FieldKind::Record`] field.
    pub fn resolve(&self, path: &str) -> Result<FieldPath> {
        let mut schema = self;
        let mut segments = Vec::new();
        let mut parts = path.split(['.', '/']).peekable();

        while let Some(part) = parts.next() {
            let field = schema
                .get(part)
                .ok_or_else(|| QueryError::unknown_field(path, part))?;
            segments.push(field.name);

            match (parts.peek(), field.kind) {
                (None, kind) => {
                    return Ok(FieldPath {
                        text: path.to_string(),
                        segments,
                        kind,
                    })
                }
                (Some(_), FieldKind::Record(nested)) => schema = nested(),
                (Some(next), _) => return Err(QueryError::unknown_field(path, next)),
            }
        }

        // `split` always yields at least one part, so the loop returns.
        Err(QueryError::unknown_field(path, path))
    }
}

/// A field path resolved against a schema.
#[derive(Debug, Clone)]
pub struct FieldPath {
    text: String,
    segments: Vec<&'static str>,
    kind: FieldKind,
}

impl FieldPath {
    /// The path as written in the query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canonical field names, outermost first.
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Kind of the final segment.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Reads the value at this path from a record.
    ///
    /// Yields [`Value::None`] when an intermediate record is absent.
    pub fn value_of<'a>(&self, record: &'a dyn Record) -> Value<'a> {
        let mut segments = self.segments.iter();
        let mut value = match segments.next() {
            Some(first) => record.field_value(first),
            None => return Value::None,
        };
        for segment in segments {
            value = match value {
                Value::Record(nested) => nested.field_value(segment),
                _ => return Value::None,
            };
        }
        value
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
