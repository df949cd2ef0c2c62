//! Vocabulary registry: IRI prefixes and short-name rewrite rules.
//!
//! `Namespaces` is an immutable value once built. Scoped rewrites are new
//! overlays (`scoped`) rather than in-place edits, so sibling compilations
//! never see each other's rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::{Value, RDFS_NS, RDF_NS, SCHEMA_NS, XSD_NS};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    /// `prefix` (with trailing colon) → full IRI prefix.
    prefixes: BTreeMap<String, String>,
    /// Exact short name → full IRI.
    rules: BTreeMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// `schema:`, `rdf:`, `rdfs:` and `xsd:`.
    pub fn with_default_prefixes() -> Self {
        let mut ns = Self::new();
        ns.register_prefix("schema:", SCHEMA_NS);
        ns.register_prefix("rdf:", RDF_NS);
        ns.register_prefix("rdfs:", RDFS_NS);
        ns.register_prefix("xsd:", XSD_NS);
        ns
    }

    pub fn register_prefix(&mut self, prefix: impl Into<String>, full: impl Into<String>) {
        self.prefixes.insert(prefix.into(), full.into());
    }

    pub fn add_rule(&mut self, short: impl Into<String>, full: impl Into<String>) {
        self.rules.insert(short.into(), full.into());
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, f)| (p.as_str(), f.as_str()))
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(s, f)| (s.as_str(), f.as_str()))
    }

    /// Overlay `rules` on top of this registry. Inner rules shadow outer ones.
    pub fn scoped(&self, rules: &BTreeMap<String, String>) -> Namespaces {
        let mut ns = self.clone();
        ns.rules
            .extend(rules.iter().map(|(k, v)| (k.clone(), v.clone())));
        ns
    }

    /// Exact rewrite rule first, then prefix expansion; unknown names pass
    /// through unchanged.
    pub fn full_iri(&self, iri: &str) -> String {
        if let Some(full) = self.rules.get(iri) {
            return full.clone();
        }
        for (prefix, full) in &self.prefixes {
            if let Some(rest) = iri.strip_prefix(prefix.as_str()) {
                return format!("{full}{rest}");
            }
        }
        iri.to_string()
    }

    /// Compact an IRI with the longest matching prefix.
    pub fn short_iri(&self, iri: &str) -> String {
        self.prefixes
            .iter()
            .filter(|(_, full)| iri.starts_with(full.as_str()))
            .max_by_key(|(_, full)| full.len())
            .map(|(prefix, full)| format!("{prefix}{}", &iri[full.len()..]))
            .unwrap_or_else(|| iri.to_string())
    }

    /// Expand IRIs and datatype IRIs inside a value.
    pub fn expand_value(&self, value: &Value) -> Value {
        match value {
            Value::Iri(iri) => Value::Iri(self.full_iri(iri)),
            Value::TypedString { value, datatype } => Value::TypedString {
                value: value.clone(),
                datatype: self.full_iri(datatype),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_win_over_prefixes() {
        let mut ns = Namespaces::with_default_prefixes();
        ns.add_rule("schema:name", "http://example.org/name");
        assert_eq!(ns.full_iri("schema:name"), "http://example.org/name");
        assert_eq!(ns.full_iri("schema:Person"), "http://schema.org/Person");
        assert_eq!(ns.full_iri("alice"), "alice");
    }

    #[test]
    fn short_iri_uses_longest_prefix() {
        let mut ns = Namespaces::new();
        ns.register_prefix("ex:", "http://example.org/");
        ns.register_prefix("exp:", "http://example.org/people/");
        assert_eq!(ns.short_iri("http://example.org/people/bob"), "exp:bob");
        assert_eq!(ns.short_iri("http://example.org/likes"), "ex:likes");
        assert_eq!(ns.short_iri("urn:x"), "urn:x");
    }

    #[test]
    fn scoped_overlay_leaves_parent_untouched() {
        let parent = Namespaces::new();
        let rules = BTreeMap::from([("bob".to_string(), "http://example.org/bob".to_string())]);
        let child = parent.scoped(&rules);
        assert_eq!(child.full_iri("bob"), "http://example.org/bob");
        assert_eq!(parent.full_iri("bob"), "bob");
    }
}
