//! Typed values stored at quad positions.
//!
//! A `Value` is the canonical form of a graph node. The store keeps a bijection
//! between values and `NodeId`s, so two nodes never share a value.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const SCHEMA_NS: &str = "http://schema.org/";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const SCHEMA_INTEGER: &str = "http://schema.org/Integer";
pub const SCHEMA_FLOAT: &str = "http://schema.org/Float";
pub const SCHEMA_BOOLEAN: &str = "http://schema.org/Boolean";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Iri(String),
    BlankNode(String),
    String(String),
    TypedString { value: String, datatype: String },
    LangString { value: String, language: String },
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn iri(iri: impl Into<String>) -> Self {
        Value::Iri(iri.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Value::Iri(_) | Value::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        !self.is_iri()
    }

    /// Lexical form: the IRI for references, the string form for literals.
    pub fn lexical(&self) -> Cow<'_, str> {
        match self {
            Value::Iri(iri) => Cow::Borrowed(iri),
            Value::BlankNode(id) => Cow::Owned(format!("_:{id}")),
            Value::String(s) => Cow::Borrowed(s),
            Value::TypedString { value, .. } | Value::LangString { value, .. } => {
                Cow::Borrowed(value)
            }
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(f) => Cow::Owned(f.to_string()),
            Value::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Text of string-like literals; `None` for references and numeric/bool literals.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::TypedString { value, .. } | Value::LangString { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Full datatype IRI for typed literals.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Value::TypedString { datatype, .. } => Some(datatype),
            Value::Int(_) => Some(SCHEMA_INTEGER),
            Value::Float(_) => Some(SCHEMA_FLOAT),
            Value::Bool(_) => Some(SCHEMA_BOOLEAN),
            _ => None,
        }
    }

    /// Name used when the value itself becomes a tag (e.g. a predicate saved by
    /// `SaveAll`).
    pub fn tag_name(&self) -> String {
        self.lexical().into_owned()
    }

    /// Ordering used by comparison filters.
    ///
    /// Numbers compare numerically (Int and Float mix), string-like literals
    /// lexically, booleans by value. Anything else is incomparable.
    pub fn compare_native(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => match (self.text(), other.text()) {
                (Some(a), Some(b)) => Some(a.cmp(b)),
                _ => None,
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Iri(_) | Value::BlankNode(_) => 0,
            Value::String(_) | Value::TypedString { .. } | Value::LangString { .. } => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Bool(_) => 3,
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Iri(a), Value::Iri(b)) => a == b,
            (Value::BlankNode(a), Value::BlankNode(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::TypedString { value: a, datatype: da },
                Value::TypedString { value: b, datatype: db },
            ) => a == b && da == db,
            (
                Value::LangString { value: a, language: la },
                Value::LangString { value: b, language: lb },
            ) => a == b && la == lb,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Iri(s) | Value::BlankNode(s) | Value::String(s) => s.hash(state),
            Value::TypedString { value, datatype } => {
                value.hash(state);
                datatype.hash(state);
            }
            Value::LangString { value, language } => {
                value.hash(state);
                language.hash(state);
            }
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
        }
    }
}

/// Canonical total order used by `Order`: references, then strings, then
/// numbers, then booleans; lexical within references and strings.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_rank = self.rank().cmp(&other.rank());
        if by_rank != Ordering::Equal {
            return by_rank;
        }
        if let (Some(a), Some(b)) = (self.numeric(), other.numeric()) {
            return a.total_cmp(&b).then_with(|| {
                matches!(self, Value::Float(_)).cmp(&matches!(other, Value::Float(_)))
            });
        }
        self.lexical()
            .cmp(&other.lexical())
            .then_with(|| kind_index(self).cmp(&kind_index(other)))
            .then_with(|| self.datatype().cmp(&other.datatype()))
            .then_with(|| language(self).cmp(&language(other)))
    }
}

fn language(v: &Value) -> Option<&str> {
    match v {
        Value::LangString { language, .. } => Some(language),
        _ => None,
    }
}

fn kind_index(v: &Value) -> u8 {
    match v {
        Value::Iri(_) => 0,
        Value::BlankNode(_) => 1,
        Value::String(_) => 2,
        Value::TypedString { .. } => 3,
        Value::LangString { .. } => 4,
        Value::Int(_) => 5,
        Value::Float(_) => 6,
        Value::Bool(_) => 7,
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri(iri) => write!(f, "<{iri}>"),
            Value::BlankNode(id) => write!(f, "_:{id}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::TypedString { value, datatype } => write!(f, "{value:?}^^<{datatype}>"),
            Value::LangString { value, language } => write!(f, "{value:?}@{language}"),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                let dt = self.datatype().unwrap_or_default();
                write!(f, "\"{}\"^^<{dt}>", self.lexical())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
