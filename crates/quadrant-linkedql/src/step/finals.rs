//! Result shaping steps. These only build iterators.

use quadrant_store::{Namespaces, QuadStore};

use super::{build_from, IteratorStep, Step};
use crate::document::{DocumentGrouping, DocumentIterator};
use crate::error::Result;
use crate::iterator::{CountIterator, ResultIterator, TagsIterator, ValueIterator};

/// One record per match with the selected tags (all tags when empty).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub from: Option<Box<Step>>,
    pub tags: Vec<String>,
}

impl IteratorStep for Select {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        let path = build_from(&self.from, store, ns, None)?;
        let values = ValueIterator::new(store, ns, path);
        Ok(Box::new(TagsIterator::new(values, self.tags.clone())))
    }
}

/// Like `Select`, with the path limited to its first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectFirst {
    pub from: Option<Box<Step>>,
    pub tags: Vec<String>,
}

impl IteratorStep for SelectFirst {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        let path = build_from(&self.from, store, ns, None)?.limit(1);
        let values = ValueIterator::new(store, ns, path);
        Ok(Box::new(TagsIterator::new(values, self.tags.clone())))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Value {
    pub from: Option<Box<Step>>,
}

impl IteratorStep for Value {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        let path = build_from(&self.from, store, ns, None)?.limit(1);
        Ok(Box::new(ValueIterator::new(store, ns, path)))
    }
}

/// Group tagged matches into one document per subject. Meant to be fed by
/// `Properties`-like steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Documents {
    pub from: Option<Box<Step>>,
    pub grouping: DocumentGrouping,
}

impl IteratorStep for Documents {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        let path = build_from(&self.from, store, ns, None)?;
        let tags = TagsIterator::new(ValueIterator::new(store, ns, path), Vec::new());
        Ok(Box::new(DocumentIterator::new(tags, self.grouping)))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Count {
    pub from: Option<Box<Step>>,
}

impl IteratorStep for Count {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        let path = build_from(&self.from, store, ns, None)?;
        Ok(Box::new(CountIterator::new(ValueIterator::new(store, ns, path))))
    }
}
