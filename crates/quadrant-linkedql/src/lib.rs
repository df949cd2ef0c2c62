//! LinkedQL over a Quadrant store.
//!
//! A query is a tree of [`Step`]s. The root step builds a [`ResultIterator`];
//! path steps below it compile into a store [`Path`](quadrant_store::Path),
//! which the store executes. Results come back as JSON-LD: single values,
//! tag records (`Select`) or per-subject documents (`Documents`).
//!
//! ```no_run
//! use quadrant_linkedql::step::{self, As, PropertyPath, Select, Visit};
//! use quadrant_linkedql::{CancelToken, QueryEngine};
//! use quadrant_store::{MemStore, Quad};
//!
//! let store = MemStore::from_quads([Quad::iris("alice", "likes", "bob", "")]);
//! let query = Select {
//!     from: step::from(As {
//!         from: step::from(Visit {
//!             from: step::from(As::named("liker")),
//!             properties: PropertyPath::iris(["likes"]),
//!         }),
//!         name: "liked".into(),
//!     }),
//!     tags: Vec::new(),
//! };
//! let records = QueryEngine::new(&store)
//!     .execute(&query.into(), &CancelToken::new())
//!     .unwrap();
//! assert_eq!(records.len(), 1);
//! ```

pub mod cancel;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod iterator;
pub mod jsonld;
pub mod pattern;
pub mod step;

pub use cancel::CancelToken;
pub use config::QueryConfig;
pub use document::{DocumentGrouping, DocumentIterator};
pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use iterator::{
    collect_results, CountIterator, ResultIterator, TagsIterator, ValueIterator, CURRENT_TAG,
};
pub use pattern::GraphPattern;
pub use step::{IteratorStep, PathStep, PropertyPath, PropertySelector, Step};
