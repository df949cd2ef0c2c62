//! Set algebra, paging and ordering.

use quadrant_store::{Namespaces, Path, QuadStore};

use super::{build_from, build_required_from, PathStep, Step};
use crate::error::Result;

/// Fold `steps` onto `from`, left to right. Each side sees the same ambient
/// path.
fn fold_steps(
    from: Path,
    steps: &[Step],
    store: &dyn QuadStore,
    ns: &Namespaces,
    ambient: Option<&Path>,
    combine: fn(Path, Path) -> Path,
) -> Result<Path> {
    let mut path = from;
    for step in steps {
        path = combine(path, step.build_path(store, ns, ambient)?);
    }
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Union {
    pub from: Option<Box<Step>>,
    pub steps: Vec<Step>,
}

impl PathStep for Union {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        fold_steps(from, &self.steps, store, ns, ambient, Path::union)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Intersect {
    pub from: Option<Box<Step>>,
    pub steps: Vec<Step>,
}

impl PathStep for Intersect {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_required_from("Intersect", &self.from, store, ns, ambient)?;
        fold_steps(from, &self.steps, store, ns, ambient, Path::intersect)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Difference {
    pub from: Option<Box<Step>>,
    pub steps: Vec<Step>,
}

impl PathStep for Difference {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        fold_steps(from, &self.steps, store, ns, ambient, Path::except)
    }
}

// ============================================================================
// Paging and ordering
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Limit {
    pub from: Option<Box<Step>>,
    pub limit: usize,
}

impl PathStep for Limit {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.limit(self.limit))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skip {
    pub from: Option<Box<Step>>,
    pub offset: usize,
}

impl PathStep for Skip {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.skip(self.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unique {
    pub from: Option<Box<Step>>,
}

impl PathStep for Unique {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.unique())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Order {
    pub from: Option<Box<Step>>,
}

impl PathStep for Order {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.order())
    }
}
