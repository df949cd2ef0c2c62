//! Result iterators.
//!
//! All iterators follow the same pull protocol: `next` advances and reports
//! whether a result is available, `result` produces the current record, and
//! `err` reports why iteration stopped early. Once `next` has returned
//! `false` the iterator stays finished.

use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use quadrant_store::{Binding, Cursor, Namespaces, NodeId, Path, QuadStore, Value};

use crate::cancel::CancelToken;
use crate::error::{QueryError, Result};
use crate::jsonld::to_jsonld;

/// Record key used for the current vertex when a match carries no tags.
pub const CURRENT_TAG: &str = "@current";

pub trait ResultIterator {
    fn next(&mut self, cancel: &CancelToken) -> bool;

    /// The current record, or `None` when it cannot be produced (see `err`).
    fn result(&mut self) -> Option<Json>;

    fn err(&self) -> Option<&QueryError>;
}

/// Drain an iterator. Records produced before a failure are dropped along
/// with it. Cancellation is reported the same way, as `Err(Canceled)`;
/// `QueryError::is_fatal` tells it apart from real failures. Callers that
/// want the records gathered up to a cancellation drive the iterator
/// themselves.
pub fn collect_results(it: &mut dyn ResultIterator, cancel: &CancelToken) -> Result<Vec<Json>> {
    let mut out = Vec::new();
    while it.next(cancel) {
        if let Some(record) = it.result() {
            out.push(record);
        }
    }
    match it.err() {
        Some(err) => Err(err.clone()),
        None => Ok(out),
    }
}

// ============================================================================
// Values
// ============================================================================

/// Walks the bindings of a path. The path is executed on the first `next`,
/// and node ids are only resolved when a result is asked for.
pub struct ValueIterator<'s> {
    store: &'s dyn QuadStore,
    ns: Namespaces,
    path: Path,
    cursor: Option<Cursor>,
    current: Option<Binding>,
    err: Option<QueryError>,
    done: bool,
    produced: usize,
}

impl<'s> ValueIterator<'s> {
    pub fn new(store: &'s dyn QuadStore, ns: &Namespaces, path: Path) -> Self {
        Self {
            store,
            ns: ns.clone(),
            path,
            cursor: None,
            current: None,
            err: None,
            done: false,
            produced: 0,
        }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.ns
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.current.as_ref()
    }

    /// Advance without resolving anything.
    pub fn advance(&mut self, cancel: &CancelToken) -> bool {
        if self.done {
            return false;
        }
        if cancel.is_canceled() {
            self.fail(QueryError::Canceled);
            return false;
        }
        if self.cursor.is_none() {
            match self.store.execute(&self.path) {
                Ok(cursor) => self.cursor = Some(cursor),
                Err(err) => {
                    self.fail(err.into());
                    return false;
                }
            }
        }
        match self.cursor.as_mut().and_then(|c| c.next()) {
            Some(binding) => {
                self.current = Some(binding);
                self.produced += 1;
                true
            }
            None => {
                self.finish();
                false
            }
        }
    }

    /// Resolve a node id. Failure ends the iteration and is kept for `err`.
    pub fn resolve(&mut self, id: NodeId) -> Option<Value> {
        match self.store.value_of(id) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                warn!(node = %id, path = self.path.kind(), "cannot resolve node");
                self.fail(QueryError::Resolution(id));
                None
            }
            Err(err) => {
                warn!(node = %id, error = %err, "store failed to resolve node");
                self.fail(err.into());
                None
            }
        }
    }

    /// Value of the current vertex.
    pub fn value(&mut self) -> Option<Value> {
        let node = self.current.as_ref()?.node;
        self.resolve(node)
    }

    fn fail(&mut self, err: QueryError) {
        debug!(produced = self.produced, error = %err, "value iterator stopped");
        self.err = Some(err);
        self.current = None;
        self.done = true;
    }

    fn finish(&mut self) {
        debug!(produced = self.produced, "value iterator exhausted");
        self.current = None;
        self.done = true;
    }
}

impl ResultIterator for ValueIterator<'_> {
    fn next(&mut self, cancel: &CancelToken) -> bool {
        self.advance(cancel)
    }

    fn result(&mut self) -> Option<Json> {
        let value = self.value()?;
        Some(to_jsonld(&value, &self.ns))
    }

    fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Projects each match to a record of tag → value.
///
/// With no `selected` tags every tag of the match is included, and a match
/// without tags yields its current vertex under `CURRENT_TAG`. Selected tags
/// missing from a match are left out of its record.
pub struct TagsIterator<'s> {
    values: ValueIterator<'s>,
    selected: Vec<String>,
}

impl<'s> TagsIterator<'s> {
    pub fn new(values: ValueIterator<'s>, selected: Vec<String>) -> Self {
        Self { values, selected }
    }

    pub fn namespaces(&self) -> &Namespaces {
        self.values.namespaces()
    }

    /// Value of the current vertex.
    pub fn subject(&mut self) -> Option<Value> {
        self.values.value()
    }

    /// Resolved tags of the current match, in tag-name order.
    pub fn tags(&mut self) -> Option<Vec<(String, Value)>> {
        let binding = self.values.binding()?;
        let picked: Vec<(String, NodeId)> = if self.selected.is_empty() {
            binding
                .tags
                .iter()
                .map(|(name, id)| (name.clone(), *id))
                .collect()
        } else {
            self.selected
                .iter()
                .filter_map(|name| binding.tags.get(name).map(|id| (name.clone(), *id)))
                .collect()
        };

        let mut out = Vec::with_capacity(picked.len());
        for (name, id) in picked {
            out.push((name, self.values.resolve(id)?));
        }
        Some(out)
    }
}

impl ResultIterator for TagsIterator<'_> {
    fn next(&mut self, cancel: &CancelToken) -> bool {
        self.values.advance(cancel)
    }

    fn result(&mut self) -> Option<Json> {
        let tags = self.tags()?;
        let mut record = Map::new();
        if tags.is_empty() && self.selected.is_empty() {
            let current = self.subject()?;
            record.insert(CURRENT_TAG.to_string(), to_jsonld(&current, self.namespaces()));
        }
        for (name, value) in tags {
            let encoded = to_jsonld(&value, self.namespaces());
            record.insert(name, encoded);
        }
        Some(Json::Object(record))
    }

    fn err(&self) -> Option<&QueryError> {
        self.values.err()
    }
}

// ============================================================================
// Count
// ============================================================================

/// Yields one `schema:Integer` with the number of matches. Nothing is
/// resolved.
pub struct CountIterator<'s> {
    values: ValueIterator<'s>,
    count: Option<i64>,
    emitted: bool,
}

impl<'s> CountIterator<'s> {
    pub fn new(values: ValueIterator<'s>) -> Self {
        Self {
            values,
            count: None,
            emitted: false,
        }
    }
}

impl ResultIterator for CountIterator<'_> {
    fn next(&mut self, cancel: &CancelToken) -> bool {
        if self.emitted {
            self.count = None;
            return false;
        }
        self.emitted = true;

        let mut n = 0i64;
        while self.values.advance(cancel) {
            n += 1;
        }
        if self.values.err().is_some() {
            return false;
        }
        self.count = Some(n);
        true
    }

    fn result(&mut self) -> Option<Json> {
        self.count
            .map(|n| to_jsonld(&Value::Int(n), self.values.namespaces()))
    }

    fn err(&self) -> Option<&QueryError> {
        self.values.err()
    }
}
