//! Start points, moves and tags.

use quadrant_store::{Namespaces, Path, QuadStore, Value as QuadValue};

use super::{build_from, build_required_from, resolve_values, PathStep, PropertyPath, Step};
use crate::error::{QueryError, Result};

/// All vertices, or the given values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    pub values: Vec<QuadValue>,
}

impl Vertex {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn iris<I, S>(iris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: iris.into_iter().map(|s| QuadValue::Iri(s.into())).collect(),
        }
    }
}

impl PathStep for Vertex {
    fn build_path(&self, store: &dyn QuadStore, ns: &Namespaces, _: Option<&Path>) -> Result<Path> {
        if self.values.is_empty() {
            return Ok(Path::all());
        }
        Ok(Path::fixed(resolve_values(store, ns, &self.values)?))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entities {
    pub identifiers: Vec<String>,
}

impl PathStep for Entities {
    fn build_path(&self, store: &dyn QuadStore, ns: &Namespaces, _: Option<&Path>) -> Result<Path> {
        let values: Vec<QuadValue> = self
            .identifiers
            .iter()
            .map(|id| QuadValue::iri(id.as_str()))
            .collect();
        Ok(Path::fixed(resolve_values(store, ns, &values)?))
    }
}

// ============================================================================
// Moves
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visit {
    pub from: Option<Box<Step>>,
    pub properties: PropertyPath,
}

impl PathStep for Visit {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        Ok(from.outgoing(self.properties.build_path(store, ns)?))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisitReverse {
    pub from: Option<Box<Step>>,
    pub properties: PropertyPath,
}

impl PathStep for VisitReverse {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        Ok(from.incoming(self.properties.build_path(store, ns)?))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Both {
    pub from: Option<Box<Step>>,
    pub properties: PropertyPath,
}

impl PathStep for Both {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        Ok(from.both(self.properties.build_path(store, ns)?))
    }
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct As {
    pub from: Option<Box<Step>>,
    pub name: String,
}

impl As {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            from: None,
            name: name.into(),
        }
    }
}

impl PathStep for As {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.tag(self.name.clone()))
    }
}

/// Return to a tagged vertex.
///
/// Without a `name`, returns to the closest `As` upstream; if there is none,
/// to the vertex the traversal started from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Back {
    pub from: Option<Box<Step>>,
    pub name: Option<String>,
}

impl Back {
    fn target(&self) -> Option<String> {
        if self.name.is_some() {
            return self.name.clone();
        }
        let mut current = self.from.as_deref();
        while let Some(step) = current {
            if let Step::As(tag) = step {
                return Some(tag.name.clone());
            }
            current = step.upstream();
        }
        None
    }
}

impl PathStep for Back {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_required_from("Back", &self.from, store, ns, ambient)?;
        Ok(from.back(self.target()))
    }
}

// ============================================================================
// Predicates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyNames {
    pub from: Option<Box<Step>>,
}

impl PathStep for PropertyNames {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.out_predicates())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReversePropertyNames {
    pub from: Option<Box<Step>>,
}

impl PathStep for ReversePropertyNames {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.in_predicates())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyNamesAs {
    pub from: Option<Box<Step>>,
    pub tag: String,
}

impl PathStep for PropertyNamesAs {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.save_predicates(self.tag.clone(), false))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReversePropertyNamesAs {
    pub from: Option<Box<Step>>,
    pub tag: String,
}

impl PathStep for ReversePropertyNamesAs {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        Ok(build_from(&self.from, store, ns, ambient)?.save_predicates(self.tag.clone(), true))
    }
}

/// Tag property values under the property name, as written. Vertices missing
/// one of the named properties are dropped; no names means every property,
/// tagged under its IRI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    pub from: Option<Box<Step>>,
    pub names: Vec<String>,
}

impl PathStep for Properties {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        save_properties(from, &self.names, store, ns, false)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReverseProperties {
    pub from: Option<Box<Step>>,
    pub names: Vec<String>,
}

impl PathStep for ReverseProperties {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        save_properties(from, &self.names, store, ns, true)
    }
}

fn save_properties(
    from: Path,
    names: &[String],
    store: &dyn QuadStore,
    ns: &Namespaces,
    reverse: bool,
) -> Result<Path> {
    if names.is_empty() {
        return Ok(from.save_all(reverse));
    }
    let mut path = from;
    for name in names {
        let via = Path::fixed(resolve_values(store, ns, &[QuadValue::iri(name.as_str())])?);
        path = if reverse {
            path.save_reverse(via, name.clone())
        } else {
            path.save(via, name.clone())
        };
    }
    Ok(path)
}

// ============================================================================
// Placeholder
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placeholder;

impl PathStep for Placeholder {
    fn build_path(&self, _: &dyn QuadStore, _: &Namespaces, ambient: Option<&Path>) -> Result<Path> {
        ambient.cloned().ok_or_else(|| {
            QueryError::configuration("Placeholder can only be used inside Optional or Where")
        })
    }
}
