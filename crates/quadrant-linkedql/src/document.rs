//! Document assembly: one JSON-LD node object per subject.
//!
//! Each tag of a match is a property of the match's current vertex. Values of
//! a property are kept in first-seen order without repeats.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::VecDeque;

use quadrant_store::Value;

use crate::cancel::CancelToken;
use crate::error::QueryError;
use crate::iterator::{ResultIterator, TagsIterator};
use crate::jsonld::to_jsonld;

/// How matches are grouped into documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentGrouping {
    /// Consecutive matches with the same subject form one document. Input
    /// that is not grouped by subject yields one document per run.
    #[default]
    Adjacent,
    /// All matches for a subject form one document, in first-seen subject
    /// order. The whole input is consumed before the first document.
    BySubject,
}

#[derive(Debug)]
struct Document {
    subject: Value,
    properties: Vec<(String, Vec<Json>)>,
}

impl Document {
    fn new(subject: Value) -> Self {
        Self {
            subject,
            properties: Vec::new(),
        }
    }

    fn add(&mut self, property: String, value: Json) {
        match self.properties.iter_mut().find(|(name, _)| *name == property) {
            Some((_, values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => self.properties.push((property, vec![value])),
        }
    }

    fn merge(&mut self, other: Document) {
        for (name, values) in other.properties {
            for value in values {
                self.add(name.clone(), value);
            }
        }
    }

    fn into_json(self) -> Json {
        let mut obj = Map::new();
        obj.insert("@id".to_string(), Json::String(self.subject.lexical().into_owned()));
        for (name, values) in self.properties {
            obj.insert(name, Json::Array(values));
        }
        Json::Object(obj)
    }
}

pub struct DocumentIterator<'s> {
    tags: TagsIterator<'s>,
    grouping: DocumentGrouping,
    pending: Option<Document>,
    ready: VecDeque<Json>,
    current: Option<Json>,
    drained: bool,
}

impl<'s> DocumentIterator<'s> {
    pub fn new(tags: TagsIterator<'s>, grouping: DocumentGrouping) -> Self {
        Self {
            tags,
            grouping,
            pending: None,
            ready: VecDeque::new(),
            current: None,
            drained: false,
        }
    }

    /// Pull one match. `None` at the end of input or when the input stopped
    /// on an error (see `failed`).
    fn pull(&mut self, cancel: &CancelToken) -> Option<Document> {
        if !self.tags.next(cancel) {
            return None;
        }
        let subject = self.tags.subject()?;
        let tags = self.tags.tags()?;

        let ns = self.tags.namespaces();
        let mut doc = Document::new(subject);
        for (name, value) in tags {
            doc.add(name, to_jsonld(&value, ns));
        }
        Some(doc)
    }

    fn failed(&self) -> bool {
        self.tags.err().is_some()
    }

    fn next_adjacent(&mut self, cancel: &CancelToken) -> Option<Json> {
        while let Some(doc) = self.pull(cancel) {
            match self.pending.take() {
                Some(mut pending) if pending.subject == doc.subject => {
                    pending.merge(doc);
                    self.pending = Some(pending);
                }
                Some(done) => {
                    self.pending = Some(doc);
                    return Some(done.into_json());
                }
                None => self.pending = Some(doc),
            }
        }
        // partial documents are discarded on error
        let last = self.pending.take();
        if self.failed() {
            return None;
        }
        last.map(Document::into_json)
    }

    fn drain_by_subject(&mut self, cancel: &CancelToken) {
        let mut docs: Vec<Document> = Vec::new();
        let mut index: AHashMap<Value, usize> = AHashMap::new();
        while let Some(doc) = self.pull(cancel) {
            match index.get(&doc.subject) {
                Some(&i) => docs[i].merge(doc),
                None => {
                    index.insert(doc.subject.clone(), docs.len());
                    docs.push(doc);
                }
            }
        }
        if self.failed() {
            return;
        }
        self.ready = docs.into_iter().map(Document::into_json).collect();
    }
}

impl ResultIterator for DocumentIterator<'_> {
    fn next(&mut self, cancel: &CancelToken) -> bool {
        self.current = match self.grouping {
            DocumentGrouping::Adjacent => self.next_adjacent(cancel),
            DocumentGrouping::BySubject => {
                if !self.drained {
                    self.drained = true;
                    self.drain_by_subject(cancel);
                }
                self.ready.pop_front()
            }
        };
        self.current.is_some()
    }

    fn result(&mut self) -> Option<Json> {
        self.current.clone()
    }

    fn err(&self) -> Option<&QueryError> {
        self.tags.err()
    }
}
