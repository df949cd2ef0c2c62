//! Query entry point: a store plus the root vocabulary.

use serde_json::Value as Json;
use tracing::debug;

use quadrant_store::{Namespaces, QuadStore};

use crate::cancel::CancelToken;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::iterator::{collect_results, ResultIterator};
use crate::step::{IteratorStep, Step};

pub struct QueryEngine<'s> {
    store: &'s dyn QuadStore,
    namespaces: Namespaces,
}

impl<'s> QueryEngine<'s> {
    /// Engine with the default configuration.
    pub fn new(store: &'s dyn QuadStore) -> Self {
        Self::with_config(store, &QueryConfig::default())
    }

    pub fn with_config(store: &'s dyn QuadStore, config: &QueryConfig) -> Self {
        Self {
            store,
            namespaces: config.namespaces(),
        }
    }

    pub fn with_namespaces(store: &'s dyn QuadStore, namespaces: Namespaces) -> Self {
        Self { store, namespaces }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Compile `step` into an iterator over its records.
    pub fn iterate(&self, step: &Step) -> Result<Box<dyn ResultIterator + 's>> {
        let it = step.build_iterator(self.store, &self.namespaces);
        match &it {
            Ok(_) => debug!(step = step.name(), "compiled query"),
            Err(err) => debug!(step = step.name(), error = %err, "query rejected"),
        }
        it
    }

    /// Compile and run `step` to completion.
    ///
    /// A canceled run returns `Err(QueryError::Canceled)` without partial
    /// results; use [`QueryEngine::iterate`] to keep what was produced.
    pub fn execute(&self, step: &Step, cancel: &CancelToken) -> Result<Vec<Json>> {
        let mut it = self.iterate(step)?;
        collect_results(it.as_mut(), cancel)
    }
}
