//! LinkedQL steps and their compilation into store paths.
//!
//! The set of steps is closed: `Step` is an enum over one struct per step
//! kind. Two capabilities are dispatched through traits:
//!
//! - `PathStep`: compile to a `quadrant_store::Path`.
//! - `IteratorStep`: compile to a `ResultIterator`.
//!
//! Every path step is also an iterator step (it yields its current values).
//! The shaping steps (`Select`, `SelectFirst`, `Value`, `Documents`, `Count`)
//! are iterator-only and cannot appear as another step's `from`.
//!
//! Compilation is a pure function of the step tree, the store and the
//! namespace. The ambient path (the relative start used by `Optional` and
//! `Where`) is passed down explicitly; `Placeholder` returns it.

mod filter;
mod finals;
mod scope;
mod set_ops;
mod traversal;

pub use filter::{
    GreaterThan, GreaterThanEquals, Has, HasReverse, Is, LessThan, LessThanEquals, Like, RegExp,
};
pub use finals::{Count, Documents, Select, SelectFirst, Value};
pub use scope::{Context, Match, Optional, Where};
pub use set_ops::{Difference, Intersect, Limit, Order, Skip, Union, Unique};
pub use traversal::{
    As, Back, Both, Entities, Placeholder, Properties, PropertyNames, PropertyNamesAs,
    ReverseProperties, ReversePropertyNames, ReversePropertyNamesAs, Vertex, Visit, VisitReverse,
};

use quadrant_store::{Namespaces, NodeId, Path, QuadStore, Value as QuadValue};

use crate::error::{QueryError, Result};
use crate::iterator::{ResultIterator, ValueIterator};

// ============================================================================
// Capabilities
// ============================================================================

pub trait PathStep {
    /// Compile into a path. `ambient` is what `Placeholder` stands for.
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path>;
}

pub trait IteratorStep {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>>;
}

// ============================================================================
// Step enum
// ============================================================================

macro_rules! steps {
    (
        path { $($p:ident => $pdesc:literal,)* }
        iterator { $($i:ident => $idesc:literal,)* }
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum Step {
            $($p($p),)*
            $($i($i),)*
        }

        $(
            impl From<$p> for Step {
                fn from(step: $p) -> Self {
                    Step::$p(step)
                }
            }

            impl IteratorStep for $p {
                fn build_iterator<'s>(
                    &self,
                    store: &'s dyn QuadStore,
                    ns: &Namespaces,
                ) -> Result<Box<dyn ResultIterator + 's>> {
                    let path = self.build_path(store, ns, None)?;
                    Ok(Box::new(ValueIterator::new(store, ns, path)))
                }
            }
        )*

        $(
            impl From<$i> for Step {
                fn from(step: $i) -> Self {
                    Step::$i(step)
                }
            }
        )*

        impl Step {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Step::$p(_) => stringify!($p),)*
                    $(Step::$i(_) => stringify!($i),)*
                }
            }

            /// One-line summary of what the step does.
            pub fn description(&self) -> &'static str {
                match self {
                    $(Step::$p(_) => $pdesc,)*
                    $(Step::$i(_) => $idesc,)*
                }
            }

            pub fn as_path_step(&self) -> Option<&dyn PathStep> {
                match self {
                    $(Step::$p(step) => Some(step),)*
                    _ => None,
                }
            }

            pub fn as_iterator_step(&self) -> &dyn IteratorStep {
                match self {
                    $(Step::$p(step) => step,)*
                    $(Step::$i(step) => step,)*
                }
            }
        }
    };
}

steps! {
    path {
        Vertex => "resolves to all the vertices, or to the given values",
        Entities => "resolves to the entities with the given identifiers",
        Visit => "moves to the objects of the given properties",
        VisitReverse => "moves to the subjects of the given properties",
        Both => "moves to both objects and subjects of the given properties",
        As => "names the current vertex so it can be selected or returned to",
        Back => "returns to the vertex named by a previous As",
        Has => "keeps vertices with the property set to one of the values",
        HasReverse => "keeps vertices that are the property value of one of the values",
        Is => "keeps vertices equal to one of the values",
        Union => "combines the current vertices with those of the given steps",
        Intersect => "keeps vertices also produced by every given step",
        Difference => "drops vertices produced by any of the given steps",
        Limit => "keeps at most the given number of vertices",
        Skip => "drops the given number of vertices",
        Unique => "removes repeated vertices",
        Order => "sorts vertices by their values",
        RegExp => "keeps literals matching the regular expression",
        Like => "keeps literals matching the wildcard pattern",
        LessThan => "keeps values lower than the given value",
        GreaterThan => "keeps values greater than the given value",
        LessThanEquals => "keeps values lower than or equal to the given value",
        GreaterThanEquals => "keeps values greater than or equal to the given value",
        PropertyNames => "moves to the names of the outgoing properties",
        ReversePropertyNames => "moves to the names of the incoming properties",
        PropertyNamesAs => "tags the names of the outgoing properties",
        ReversePropertyNamesAs => "tags the names of the incoming properties",
        Properties => "tags the values of the given properties",
        ReverseProperties => "tags the subjects of the given reverse properties",
        Placeholder => "stands for the vertices of the enclosing Optional or Where",
        Optional => "extends each match with the tags of a step, if it matches",
        Where => "keeps vertices matching every clause and collects their tags",
        Context => "compiles a step with extra vocabulary rules",
        Match => "keeps vertices matching a JSON-LD graph pattern",
    }
    iterator {
        Select => "returns the tagged vertices of each match",
        SelectFirst => "returns the tagged vertices of the first match",
        Value => "returns the first value",
        Documents => "returns one JSON-LD document per subject",
        Count => "returns the number of matches",
    }
}

impl Step {
    /// The step this one reads from, if any.
    pub fn upstream(&self) -> Option<&Step> {
        let from = match self {
            Step::Vertex(_) | Step::Entities(_) | Step::Placeholder(_) => return None,
            Step::Visit(s) => &s.from,
            Step::VisitReverse(s) => &s.from,
            Step::Both(s) => &s.from,
            Step::As(s) => &s.from,
            Step::Back(s) => &s.from,
            Step::Has(s) => &s.from,
            Step::HasReverse(s) => &s.from,
            Step::Is(s) => &s.from,
            Step::Union(s) => &s.from,
            Step::Intersect(s) => &s.from,
            Step::Difference(s) => &s.from,
            Step::Limit(s) => &s.from,
            Step::Skip(s) => &s.from,
            Step::Unique(s) => &s.from,
            Step::Order(s) => &s.from,
            Step::RegExp(s) => &s.from,
            Step::Like(s) => &s.from,
            Step::LessThan(s) => &s.from,
            Step::GreaterThan(s) => &s.from,
            Step::LessThanEquals(s) => &s.from,
            Step::GreaterThanEquals(s) => &s.from,
            Step::PropertyNames(s) => &s.from,
            Step::ReversePropertyNames(s) => &s.from,
            Step::PropertyNamesAs(s) => &s.from,
            Step::ReversePropertyNamesAs(s) => &s.from,
            Step::Properties(s) => &s.from,
            Step::ReverseProperties(s) => &s.from,
            Step::Optional(s) => &s.from,
            Step::Where(s) => &s.from,
            Step::Context(s) => &s.from,
            Step::Match(s) => &s.from,
            Step::Select(s) => &s.from,
            Step::SelectFirst(s) => &s.from,
            Step::Value(s) => &s.from,
            Step::Documents(s) => &s.from,
            Step::Count(s) => &s.from,
        };
        from.as_deref()
    }

    pub(crate) fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        self.as_path_step()
            .ok_or_else(|| {
                QueryError::configuration(format!("{} cannot be used as a path", self.name()))
            })?
            .build_path(store, ns, ambient)
    }
}

impl IteratorStep for Step {
    fn build_iterator<'s>(
        &self,
        store: &'s dyn QuadStore,
        ns: &Namespaces,
    ) -> Result<Box<dyn ResultIterator + 's>> {
        self.as_iterator_step().build_iterator(store, ns)
    }
}

/// Box a step for use as another step's `from`.
pub fn from(step: impl Into<Step>) -> Option<Box<Step>> {
    Some(Box::new(step.into()))
}

// ============================================================================
// Property paths
// ============================================================================

/// One alternative in a property path: a predicate IRI, or a step whose
/// values are predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySelector {
    Iri(String),
    Step(Box<Step>),
}

/// Alternatives of predicates. Empty means "any predicate".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyPath(pub Vec<PropertySelector>);

impl PropertyPath {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn iris<I, S>(iris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(iris.into_iter().map(|s| PropertySelector::Iri(s.into())).collect())
    }

    pub fn step(step: impl Into<Step>) -> Self {
        Self(vec![PropertySelector::Step(Box::new(step.into()))])
    }

    pub fn build_path(&self, store: &dyn QuadStore, ns: &Namespaces) -> Result<Path> {
        let mut alternatives = Vec::with_capacity(self.0.len());
        for selector in &self.0 {
            alternatives.push(match selector {
                PropertySelector::Iri(iri) => {
                    Path::fixed(resolve_values(store, ns, &[QuadValue::iri(iri.as_str())])?)
                }
                PropertySelector::Step(step) => step.build_path(store, ns, None)?,
            });
        }
        Ok(alternatives
            .into_iter()
            .reduce(Path::union)
            .unwrap_or_else(Path::all))
    }
}

// ============================================================================
// Shared compilation helpers
// ============================================================================

/// Compile `from`, defaulting to every node when it is absent.
pub(crate) fn build_from(
    from: &Option<Box<Step>>,
    store: &dyn QuadStore,
    ns: &Namespaces,
    ambient: Option<&Path>,
) -> Result<Path> {
    match from {
        Some(step) => step.build_path(store, ns, ambient),
        None => Ok(Path::all()),
    }
}

/// Compile a `from` the step cannot do without.
pub(crate) fn build_required_from(
    step: &'static str,
    from: &Option<Box<Step>>,
    store: &dyn QuadStore,
    ns: &Namespaces,
    ambient: Option<&Path>,
) -> Result<Path> {
    match from {
        Some(from) => from.build_path(store, ns, ambient),
        None => Err(QueryError::configuration(format!("{step} requires a from step"))),
    }
}

/// Resolve values to node ids, expanding IRIs through `ns`. Values the store
/// has never seen contribute nothing.
pub(crate) fn resolve_values(
    store: &dyn QuadStore,
    ns: &Namespaces,
    values: &[QuadValue],
) -> Result<Vec<NodeId>> {
    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        if let Some(id) = store.node_of(&ns.expand_value(value))? {
            ids.push(id);
        }
    }
    Ok(ids)
}
