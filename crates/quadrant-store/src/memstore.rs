//! In-memory reference quad store.
//!
//! Quads are interned on insert and indexed by every position, so each
//! `quads_by` lookup is a single hash probe. Node ids follow first-seen order
//! (subject, predicate, object, label of each inserted quad), which is also
//! the order `nodes()` reports.

use ahash::{AHashMap, AHashSet};

use crate::quad::{Direction, IndexedQuad, Quad, QuadId};
use crate::value::Value;
use crate::{NodeId, QuadStore, StoreError, ValueInterner};

#[derive(Default)]
pub struct MemStore {
    interner: ValueInterner,
    quads: Vec<IndexedQuad>,
    /// Dedupe set over `(s, p, o, label)`.
    seen: AHashSet<(NodeId, NodeId, NodeId, Option<NodeId>)>,
    by_subject: AHashMap<NodeId, Vec<QuadId>>,
    by_predicate: AHashMap<NodeId, Vec<QuadId>>,
    by_object: AHashMap<NodeId, Vec<QuadId>>,
    by_label: AHashMap<NodeId, Vec<QuadId>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quads(quads: impl IntoIterator<Item = Quad>) -> Self {
        let mut store = Self::new();
        for quad in quads {
            store.add_quad(quad);
        }
        store
    }

    /// Number of stored quads.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.interner.len()
    }

    /// Add a quad. Returns `None` when an identical quad is already stored.
    pub fn add_quad(&mut self, quad: Quad) -> Option<QuadId> {
        let subject = self.interner.intern(&quad.subject);
        let predicate = self.interner.intern(&quad.predicate);
        let object = self.interner.intern(&quad.object);
        let label = quad.label.as_ref().map(|l| self.interner.intern(l));

        if !self.seen.insert((subject, predicate, object, label)) {
            return None;
        }

        let id = QuadId::new(self.quads.len() as u32);
        self.by_subject.entry(subject).or_default().push(id);
        self.by_predicate.entry(predicate).or_default().push(id);
        self.by_object.entry(object).or_default().push(id);
        if let Some(label) = label {
            self.by_label.entry(label).or_default().push(id);
        }

        self.quads.push(IndexedQuad {
            id,
            subject,
            predicate,
            object,
            label,
        });
        Some(id)
    }

    pub fn quad(&self, id: QuadId) -> Option<&IndexedQuad> {
        self.quads.get(id.raw() as usize)
    }

    /// Resolve an interned quad back into values.
    pub fn resolve_quad(&self, id: QuadId) -> Result<Quad, StoreError> {
        let q = self.quad(id).ok_or(StoreError::UnknownQuad(id))?;
        let get = |n: NodeId| self.interner.lookup(n).ok_or(StoreError::UnknownQuad(id));
        Ok(Quad {
            subject: get(q.subject)?,
            predicate: get(q.predicate)?,
            object: get(q.object)?,
            label: q.label.map(get).transpose()?,
        })
    }

    fn index(&self, direction: Direction) -> &AHashMap<NodeId, Vec<QuadId>> {
        match direction {
            Direction::Subject => &self.by_subject,
            Direction::Predicate => &self.by_predicate,
            Direction::Object => &self.by_object,
            Direction::Label => &self.by_label,
        }
    }
}

impl QuadStore for MemStore {
    fn node_of(&self, value: &Value) -> Result<Option<NodeId>, StoreError> {
        Ok(self.interner.id_of(value))
    }

    fn value_of(&self, id: NodeId) -> Result<Option<Value>, StoreError> {
        Ok(self.interner.lookup(id))
    }

    fn nodes(&self) -> Result<Vec<NodeId>, StoreError> {
        Ok((0..self.interner.len() as u32).map(NodeId::new).collect())
    }

    fn quads_by(&self, direction: Direction, node: NodeId) -> Result<Vec<IndexedQuad>, StoreError> {
        Ok(self
            .index(direction)
            .get(&node)
            .map(|ids| ids.iter().filter_map(|&id| self.quad(id).copied()).collect())
            .unwrap_or_default())
    }
}
