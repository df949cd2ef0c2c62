//! Steps that open a scope: an ambient path or a vocabulary overlay.

use std::collections::BTreeMap;

use quadrant_store::{Namespaces, Path, QuadStore};

use super::{build_from, build_required_from, PathStep, Step};
use crate::error::Result;
use crate::pattern::{compile_pattern, GraphPattern};

/// Left outer join: every `from` match is kept, extended with the tags of
/// the first match of `step` when there is one. `step` reaches the `from`
/// vertex through `Placeholder`.
#[derive(Debug, Clone, PartialEq)]
pub struct Optional {
    pub from: Option<Box<Step>>,
    pub step: Box<Step>,
}

impl PathStep for Optional {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_required_from("Optional", &self.from, store, ns, ambient)?;
        let extension = self.step.build_path(store, ns, Some(&Path::here()))?;
        Ok(from.optional(extension))
    }
}

/// Conjunction of clauses evaluated from each `from` match. The position
/// does not move; the clauses' tags are collected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    pub from: Option<Box<Step>>,
    pub steps: Vec<Step>,
}

impl PathStep for Where {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        Ok(from.where_clauses(build_clauses(&self.steps, store, ns)?))
    }
}

fn build_clauses(steps: &[Step], store: &dyn QuadStore, ns: &Namespaces) -> Result<Vec<Path>> {
    let here = Path::here();
    steps
        .iter()
        .map(|step| step.build_path(store, ns, Some(&here)))
        .collect()
}

/// Compile `from` with extra short-name rules. The rules only apply inside
/// this subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    pub from: Option<Box<Step>>,
    pub rules: BTreeMap<String, String>,
}

impl PathStep for Context {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let scoped = ns.scoped(&self.rules);
        build_from(&self.from, store, &scoped, ambient)
    }
}

/// Keep vertices matching a JSON-LD graph pattern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Match {
    pub from: Option<Box<Step>>,
    pub pattern: GraphPattern,
}

impl PathStep for Match {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        let clauses = compile_pattern(&self.pattern, ns)?;
        Ok(from.where_clauses(build_clauses(&clauses, store, ns)?))
    }
}
