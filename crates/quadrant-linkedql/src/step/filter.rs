//! Steps that keep or drop vertices without moving.

use quadrant_store::{CompareOp, Namespaces, Path, QuadStore, Value as QuadValue, ValueFilter};

use super::{build_from, resolve_values, PathStep, PropertyPath, Step};
use crate::error::{QueryError, Result};

/// Keep vertices with `property` set to one of `values`; no values means
/// the property only has to be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Has {
    pub from: Option<Box<Step>>,
    pub property: PropertyPath,
    pub values: Vec<QuadValue>,
}

impl PathStep for Has {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        let via = self.property.build_path(store, ns)?;
        Ok(from.has(via, targets(store, ns, &self.values)?))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HasReverse {
    pub from: Option<Box<Step>>,
    pub property: PropertyPath,
    pub values: Vec<QuadValue>,
}

impl PathStep for HasReverse {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        let via = self.property.build_path(store, ns)?;
        Ok(from.has_reverse(via, targets(store, ns, &self.values)?))
    }
}

fn targets(
    store: &dyn QuadStore,
    ns: &Namespaces,
    values: &[QuadValue],
) -> Result<Option<Vec<quadrant_store::NodeId>>> {
    if values.is_empty() {
        return Ok(None);
    }
    resolve_values(store, ns, values).map(Some)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Is {
    pub from: Option<Box<Step>>,
    pub values: Vec<QuadValue>,
}

impl PathStep for Is {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let from = build_from(&self.from, store, ns, ambient)?;
        Ok(from.is(resolve_values(store, ns, &self.values)?))
    }
}

// ============================================================================
// Literal text filters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegExp {
    pub from: Option<Box<Step>>,
    pub pattern: String,
}

impl PathStep for RegExp {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let filter = ValueFilter::regex(&self.pattern).map_err(|err| {
            QueryError::configuration(format!(
                "invalid regular expression {:?}: {err}",
                self.pattern
            ))
        })?;
        Ok(build_from(&self.from, store, ns, ambient)?.filter(filter))
    }
}

/// `%` matches any run of characters and `_` a single one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Like {
    pub from: Option<Box<Step>>,
    pub pattern: String,
}

impl PathStep for Like {
    fn build_path(
        &self,
        store: &dyn QuadStore,
        ns: &Namespaces,
        ambient: Option<&Path>,
    ) -> Result<Path> {
        let filter = ValueFilter::wildcard(&self.pattern).map_err(|err| {
            QueryError::configuration(format!("invalid pattern {:?}: {err}", self.pattern))
        })?;
        Ok(build_from(&self.from, store, ns, ambient)?.filter(filter))
    }
}

// ============================================================================
// Comparisons
// ============================================================================

macro_rules! comparison {
    ($(#[$doc:meta])* $name:ident, $op:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub from: Option<Box<Step>>,
            pub value: QuadValue,
        }

        impl PathStep for $name {
            fn build_path(
                &self,
                store: &dyn QuadStore,
                ns: &Namespaces,
                ambient: Option<&Path>,
            ) -> Result<Path> {
                let bound = ns.expand_value(&self.value);
                Ok(build_from(&self.from, store, ns, ambient)?
                    .filter(ValueFilter::compare($op, bound)))
            }
        }
    };
}

comparison!(
    /// Keep values ordered strictly below `value`. Values of another kind are
    /// dropped.
    LessThan,
    CompareOp::LessThan
);
comparison!(GreaterThan, CompareOp::GreaterThan);
comparison!(LessThanEquals, CompareOp::LessThanEquals);
comparison!(GreaterThanEquals, CompareOp::GreaterThanEquals);
