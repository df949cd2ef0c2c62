//! Quadrant: LinkedQL queries over a quad store.
//!
//! Umbrella crate for the workspace; see [`quadrant_linkedql`] for the query
//! layer and [`quadrant_store`] for the store contract.

pub use quadrant_linkedql as linkedql;
pub use quadrant_store as store;
