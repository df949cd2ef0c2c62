//! Quadrant store: the quad-store contract the LinkedQL layer compiles against.
//!
//! This crate owns everything below the step compiler:
//!
//! 1. **Typed values** (`Value`): IRIs, blank nodes and literals, with a
//!    canonical total order and a native comparison for filters.
//! 2. **Interning**: every value is stored once and addressed by a compact
//!    `NodeId` (a bijection, so ids never alias).
//! 3. **Path algebra** (`Path`): the store-native traversal expression the
//!    step compiler produces, and its evaluator (`Cursor` of `Binding`s).
//! 4. **`MemStore`**: an indexed in-memory reference store (subject, predicate,
//!    object and label indexes).
//! 5. **`Namespaces`**: prefix table and vocabulary rewrite rules.
//!
//! Everything here is a read-side contract: evaluating a path never mutates
//! the store.

pub mod eval;
pub mod memstore;
pub mod path;
pub mod quad;
pub mod value;
pub mod voc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

pub use eval::{Binding, Cursor, Evaluator};
pub use memstore::MemStore;
pub use path::{CompareOp, Path, ValueFilter};
pub use quad::{Direction, IndexedQuad, Quad, QuadId};
pub use value::Value;
pub use voc::Namespaces;

// ============================================================================
// Node identifiers
// ============================================================================

/// Opaque store-assigned handle to a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("path starts at the ambient position but no ambient binding was supplied")]
    MissingAmbient,

    #[error("unknown quad {0:?}")]
    UnknownQuad(QuadId),

    #[error("node {0} has no value")]
    UnknownNode(NodeId),

    #[error("store backend failure: {0}")]
    Backend(String),
}

// ============================================================================
// Value Interning
// ============================================================================

/// Value interner: maps canonical values to node ids and back.
pub struct ValueInterner {
    value_to_id: DashMap<Value, NodeId>,
    id_to_value: DashMap<NodeId, Value>,
    next_id: AtomicU32,
}

impl ValueInterner {
    pub fn new() -> Self {
        Self {
            value_to_id: DashMap::new(),
            id_to_value: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Intern a value, returning its id. Ids are assigned in first-seen order.
    pub fn intern(&self, value: &Value) -> NodeId {
        if let Some(id) = self.value_to_id.get(value) {
            return *id;
        }

        *self
            .value_to_id
            .entry(value.clone())
            .or_insert_with(|| {
                let id = NodeId(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.id_to_value.insert(id, value.clone());
                id
            })
    }

    /// Look up an existing id without inserting.
    pub fn id_of(&self, value: &Value) -> Option<NodeId> {
        self.value_to_id.get(value).map(|id| *id)
    }

    pub fn lookup(&self, id: NodeId) -> Option<Value> {
        self.id_to_value.get(&id).map(|v| v.clone())
    }

    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::SeqCst) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ValueInterner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Store contract
// ============================================================================

/// Read-side contract of a quad store.
///
/// All operations are side-effect-free reads. Implementations may block (e.g.
/// on I/O); callers treat every call as an opaque synchronous step.
pub trait QuadStore {
    /// Resolve a value to its node id, `None` when the store has never seen it.
    fn node_of(&self, value: &Value) -> Result<Option<NodeId>, StoreError>;

    /// Resolve a node id to its canonical value.
    fn value_of(&self, id: NodeId) -> Result<Option<Value>, StoreError>;

    /// Every node, in store order.
    fn nodes(&self) -> Result<Vec<NodeId>, StoreError>;

    /// Quads where `node` sits at `direction`, in quad order.
    fn quads_by(&self, direction: Direction, node: NodeId) -> Result<Vec<IndexedQuad>, StoreError>;

    /// Execute a path expression, producing a cursor over its bindings.
    fn execute(&self, path: &Path) -> Result<Cursor, StoreError> {
        Evaluator::new(self).cursor(path)
    }
}

impl<S: QuadStore + ?Sized> QuadStore for &S {
    fn node_of(&self, value: &Value) -> Result<Option<NodeId>, StoreError> {
        (**self).node_of(value)
    }

    fn value_of(&self, id: NodeId) -> Result<Option<Value>, StoreError> {
        (**self).value_of(id)
    }

    fn nodes(&self) -> Result<Vec<NodeId>, StoreError> {
        (**self).nodes()
    }

    fn quads_by(&self, direction: Direction, node: NodeId) -> Result<Vec<IndexedQuad>, StoreError> {
        (**self).quads_by(direction, node)
    }

    fn execute(&self, path: &Path) -> Result<Cursor, StoreError> {
        (**self).execute(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_a_bijection() {
        let interner = ValueInterner::new();

        let alice = interner.intern(&Value::iri("alice"));
        let name = interner.intern(&Value::string("alice"));
        let again = interner.intern(&Value::iri("alice"));

        assert_eq!(alice, again);
        assert_ne!(alice, name);
        assert_eq!(interner.lookup(alice), Some(Value::iri("alice")));
        assert_eq!(interner.lookup(name), Some(Value::string("alice")));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn id_of_does_not_insert() {
        let interner = ValueInterner::new();
        assert_eq!(interner.id_of(&Value::Int(1)), None);
        assert!(interner.is_empty());
    }
}
