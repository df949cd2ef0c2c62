//! Reference evaluator for `Path` expressions.
//!
//! Evaluation is eager at the `NodeId` level: a path produces a vector of
//! bindings, and the `Cursor` hands them out one at a time. Values are never
//! resolved here except where a step needs them (`Order`, `Filter`,
//! `SaveAll` tag names).

use ahash::AHashMap;
use roaring::RoaringBitmap;
use std::collections::BTreeMap;
use tracing::trace;

use crate::path::Path;
use crate::quad::{Direction, IndexedQuad};
use crate::value::Value;
use crate::{NodeId, QuadStore, StoreError};

// ============================================================================
// Bindings and cursors
// ============================================================================

/// One matched traversal: where it is, where it started, and what it tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub node: NodeId,
    pub origin: NodeId,
    pub tags: BTreeMap<String, NodeId>,
}

impl Binding {
    pub fn start(node: NodeId) -> Self {
        Self {
            node,
            origin: node,
            tags: BTreeMap::new(),
        }
    }

    fn moved(&self, node: NodeId) -> Self {
        Self {
            node,
            origin: self.origin,
            tags: self.tags.clone(),
        }
    }

    fn tagged(&self, name: &str, node: NodeId) -> Self {
        let mut next = self.clone();
        next.tags.insert(name.to_string(), node);
        next
    }

    /// Add `other`'s tags that this binding does not already carry.
    fn absorb(&mut self, other: &Binding) {
        for (name, node) in &other.tags {
            self.tags.entry(name.clone()).or_insert(*node);
        }
    }
}

/// Pull cursor over the bindings of an executed path. Finite, not restartable.
#[derive(Debug)]
pub struct Cursor {
    inner: std::vec::IntoIter<Binding>,
}

impl Cursor {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            inner: bindings.into_iter(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.inner.len()
    }
}

impl Iterator for Cursor {
    type Item = Binding;

    fn next(&mut self) -> Option<Binding> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl From<Vec<Binding>> for Cursor {
    fn from(bindings: Vec<Binding>) -> Self {
        Self::new(bindings)
    }
}

// ============================================================================
// Evaluator
// ============================================================================

pub struct Evaluator<'s, S: QuadStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: QuadStore + ?Sized> Evaluator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Evaluate a rooted path into a cursor.
    pub fn cursor(&self, path: &Path) -> Result<Cursor, StoreError> {
        self.evaluate(path, None).map(Cursor::new)
    }

    /// Evaluate `path`. `seed` is the binding `Path::Here` stands for; it is
    /// handed down through `from` children and both sides of set operations,
    /// but never into `via` predicate paths.
    pub fn evaluate(&self, path: &Path, seed: Option<&Binding>) -> Result<Vec<Binding>, StoreError> {
        let out = match path {
            Path::All => self.store.nodes()?.into_iter().map(Binding::start).collect(),
            Path::Fixed(nodes) => nodes.iter().copied().map(Binding::start).collect(),
            Path::Here => vec![seed.cloned().ok_or(StoreError::MissingAmbient)?],

            Path::Out { from, via } => self.traverse(from, via, seed, &[Direction::Subject])?,
            Path::In { from, via } => self.traverse(from, via, seed, &[Direction::Object])?,
            Path::Both { from, via } => {
                self.traverse(from, via, seed, &[Direction::Subject, Direction::Object])?
            }

            Path::OutPredicates { from } => self.predicates(from, seed, Direction::Subject)?,
            Path::InPredicates { from } => self.predicates(from, seed, Direction::Object)?,
            Path::SavePredicates { from, tag, reverse } => {
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    let mut seen = RoaringBitmap::new();
                    for q in self.store.quads_by(near(*reverse), b.node)? {
                        if seen.insert(q.predicate.raw()) {
                            out.push(b.tagged(tag, q.predicate));
                        }
                    }
                }
                out
            }

            Path::Save {
                from,
                via,
                tag,
                reverse,
            } => {
                let preds = self.predicate_set(via)?;
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    for q in self.store.quads_by(near(*reverse), b.node)? {
                        if allows(&preds, q.predicate) {
                            out.push(b.tagged(tag, far(&q, *reverse)));
                        }
                    }
                }
                out
            }
            Path::SaveAll { from, reverse } => {
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    out.extend(self.save_all(&b, *reverse)?);
                }
                out
            }

            Path::Has {
                from,
                via,
                values,
                reverse,
            } => {
                let preds = self.predicate_set(via)?;
                let targets: Option<RoaringBitmap> =
                    values.as_ref().map(|v| v.iter().map(|n| n.raw()).collect());
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    let hit = self.store.quads_by(near(*reverse), b.node)?.iter().any(|q| {
                        allows(&preds, q.predicate) && allows(&targets, far(q, *reverse))
                    });
                    if hit {
                        out.push(b);
                    }
                }
                out
            }
            Path::Is { from, values } => {
                let keep: RoaringBitmap = values.iter().map(|n| n.raw()).collect();
                self.evaluate(from, seed)?
                    .into_iter()
                    .filter(|b| keep.contains(b.node.raw()))
                    .collect()
            }

            Path::Tag { from, name } => self
                .evaluate(from, seed)?
                .into_iter()
                .map(|b| b.tagged(name, b.node))
                .collect(),
            Path::Back { from, tag } => self
                .evaluate(from, seed)?
                .into_iter()
                .filter_map(|b| match tag {
                    Some(name) => b.tags.get(name).map(|&node| b.moved(node)),
                    None => Some(b.moved(b.origin)),
                })
                .collect(),

            Path::Union(left, right) => {
                let mut out = self.evaluate(left, seed)?;
                out.extend(self.evaluate(right, seed)?);
                out
            }
            Path::Intersect(left, right) => {
                let right = self.evaluate(right, seed)?;
                let mut first: AHashMap<NodeId, &Binding> = AHashMap::new();
                for b in &right {
                    first.entry(b.node).or_insert(b);
                }
                let mut out = Vec::new();
                for mut b in self.evaluate(left, seed)? {
                    if let Some(other) = first.get(&b.node) {
                        b.absorb(other);
                        out.push(b);
                    }
                }
                out
            }
            Path::Except(left, right) => {
                let drop = self.node_set(right, seed)?;
                self.evaluate(left, seed)?
                    .into_iter()
                    .filter(|b| !drop.contains(b.node.raw()))
                    .collect()
            }

            Path::Limit { from, limit } => {
                let mut out = self.evaluate(from, seed)?;
                out.truncate(*limit);
                out
            }
            Path::Skip { from, offset } => self
                .evaluate(from, seed)?
                .into_iter()
                .skip(*offset)
                .collect(),
            Path::Unique { from } => {
                let mut seen = RoaringBitmap::new();
                self.evaluate(from, seed)?
                    .into_iter()
                    .filter(|b| seen.insert(b.node.raw()))
                    .collect()
            }
            Path::Order { from } => {
                let mut keyed = Vec::new();
                for b in self.evaluate(from, seed)? {
                    keyed.push((self.value(b.node)?, b));
                }
                // sort_by is stable, so equal values keep traversal order
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                keyed.into_iter().map(|(_, b)| b).collect()
            }

            Path::Optional { from, extension } => {
                let mut out = Vec::new();
                for mut b in self.evaluate(from, seed)? {
                    if let Some(ext) = self.evaluate(extension, Some(&b))?.into_iter().next() {
                        b.tags.extend(ext.tags);
                    }
                    out.push(b);
                }
                out
            }
            Path::Where { from, clauses } => {
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    out.extend(self.join_clauses(b, clauses)?);
                }
                out
            }

            Path::Filter { from, filter } => {
                let mut out = Vec::new();
                for b in self.evaluate(from, seed)? {
                    let keep = self
                        .store
                        .value_of(b.node)?
                        .is_some_and(|v| filter.matches(&v));
                    if keep {
                        out.push(b);
                    }
                }
                out
            }
        };

        trace!(kind = path.kind(), produced = out.len(), "evaluated path");
        Ok(out)
    }

    /// Chain every clause from `start`. Each surviving combination keeps the
    /// start position and carries the union of the clauses' tags.
    fn join_clauses(&self, start: Binding, clauses: &[Path]) -> Result<Vec<Binding>, StoreError> {
        let mut current = vec![start];
        for clause in clauses {
            let mut next = Vec::new();
            for c in &current {
                for r in self.evaluate(clause, Some(c))? {
                    let mut joined = c.clone();
                    joined.tags.extend(r.tags);
                    next.push(joined);
                }
            }
            if next.is_empty() {
                return Ok(next);
            }
            current = next;
        }
        Ok(current)
    }

    fn traverse(
        &self,
        from: &Path,
        via: &Path,
        seed: Option<&Binding>,
        directions: &[Direction],
    ) -> Result<Vec<Binding>, StoreError> {
        let preds = self.predicate_set(via)?;
        let mut out = Vec::new();
        for b in self.evaluate(from, seed)? {
            let mut hops: Vec<(IndexedQuad, bool)> = Vec::new();
            for &dir in directions {
                let reverse = dir == Direction::Object;
                for q in self.store.quads_by(dir, b.node)? {
                    if allows(&preds, q.predicate) {
                        hops.push((q, reverse));
                    }
                }
            }
            if directions.len() > 1 {
                hops.sort_by_key(|(q, _)| q.id);
            }
            out.extend(hops.iter().map(|(q, reverse)| b.moved(far(q, *reverse))));
        }
        Ok(out)
    }

    fn predicates(
        &self,
        from: &Path,
        seed: Option<&Binding>,
        direction: Direction,
    ) -> Result<Vec<Binding>, StoreError> {
        let mut out = Vec::new();
        for b in self.evaluate(from, seed)? {
            let mut seen = RoaringBitmap::new();
            for q in self.store.quads_by(direction, b.node)? {
                if seen.insert(q.predicate.raw()) {
                    out.push(b.moved(q.predicate));
                }
            }
        }
        Ok(out)
    }

    /// Cartesian product over predicates: one binding per choice of far end
    /// for every predicate the node has. A node without edges in that
    /// direction produces nothing.
    fn save_all(&self, b: &Binding, reverse: bool) -> Result<Vec<Binding>, StoreError> {
        let mut groups: Vec<(String, Vec<NodeId>)> = Vec::new();
        let mut slot: AHashMap<NodeId, usize> = AHashMap::new();
        for q in self.store.quads_by(near(reverse), b.node)? {
            let idx = match slot.get(&q.predicate) {
                Some(&idx) => idx,
                None => {
                    let name = self.value(q.predicate)?.tag_name();
                    groups.push((name, Vec::new()));
                    slot.insert(q.predicate, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[idx].1.push(far(&q, reverse));
        }
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = vec![b.clone()];
        for (name, targets) in &groups {
            out = out
                .iter()
                .flat_map(|partial| targets.iter().map(move |&t| partial.tagged(name, t)))
                .collect();
        }
        Ok(out)
    }

    /// Nodes a `via` path produces. `None` stands for "any predicate".
    fn predicate_set(&self, via: &Path) -> Result<Option<RoaringBitmap>, StoreError> {
        if matches!(via, Path::All) {
            return Ok(None);
        }
        self.node_set(via, None).map(Some)
    }

    fn node_set(&self, path: &Path, seed: Option<&Binding>) -> Result<RoaringBitmap, StoreError> {
        Ok(self
            .evaluate(path, seed)?
            .iter()
            .map(|b| b.node.raw())
            .collect())
    }

    fn value(&self, node: NodeId) -> Result<Value, StoreError> {
        self.store
            .value_of(node)?
            .ok_or(StoreError::UnknownNode(node))
    }
}

fn near(reverse: bool) -> Direction {
    if reverse {
        Direction::Object
    } else {
        Direction::Subject
    }
}

fn far(q: &IndexedQuad, reverse: bool) -> NodeId {
    if reverse {
        q.subject
    } else {
        q.object
    }
}

fn allows(set: &Option<RoaringBitmap>, node: NodeId) -> bool {
    set.as_ref().map_or(true, |s| s.contains(node.raw()))
}
