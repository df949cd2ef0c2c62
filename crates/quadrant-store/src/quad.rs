//! Quads and their interned form.

use serde::{Deserialize, Serialize};

use crate::value::Value;
use crate::NodeId;

/// A fact: `subject -predicate-> object`, optionally inside a named graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: Value,
    pub predicate: Value,
    pub object: Value,
    pub label: Option<Value>,
}

impl Quad {
    pub fn new(subject: Value, predicate: Value, object: Value, label: Option<Value>) -> Self {
        Self {
            subject,
            predicate,
            object,
            label,
        }
    }

    /// All-IRI quad; an empty label means the default graph.
    pub fn iris(subject: &str, predicate: &str, object: &str, label: &str) -> Self {
        Self {
            subject: Value::iri(subject),
            predicate: Value::iri(predicate),
            object: Value::iri(object),
            label: (!label.is_empty()).then(|| Value::iri(label)),
        }
    }
}

/// Position of a node inside a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Subject,
    Predicate,
    Object,
    Label,
}

/// Stable quad index inside a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct QuadId(u32);

impl QuadId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A quad with every position replaced by its node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedQuad {
    pub id: QuadId,
    pub subject: NodeId,
    pub predicate: NodeId,
    pub object: NodeId,
    pub label: Option<NodeId>,
}

impl IndexedQuad {
    pub fn get(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Subject => Some(self.subject),
            Direction::Predicate => Some(self.predicate),
            Direction::Object => Some(self.object),
            Direction::Label => self.label,
        }
    }
}
