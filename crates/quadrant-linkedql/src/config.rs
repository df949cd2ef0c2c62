//! Query configuration: the root vocabulary every compilation starts from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use quadrant_store::Namespaces;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Register `schema:`, `rdf:`, `rdfs:` and `xsd:` before `prefixes`.
    pub use_default_prefixes: bool,
    /// Extra prefixes (`"ex:" -> "http://example.org/"`).
    pub prefixes: BTreeMap<String, String>,
    /// Global short-name rewrite rules, shadowed by any `Context` step.
    pub rules: BTreeMap<String, String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            use_default_prefixes: true,
            prefixes: BTreeMap::new(),
            rules: BTreeMap::new(),
        }
    }
}

impl QueryConfig {
    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse query config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn namespaces(&self) -> Namespaces {
        let mut ns = if self.use_default_prefixes {
            Namespaces::with_default_prefixes()
        } else {
            Namespaces::new()
        };
        for (prefix, full) in &self.prefixes {
            ns.register_prefix(prefix.clone(), full.clone());
        }
        for (short, full) in &self.rules {
            ns.add_rule(short.clone(), full.clone());
        }
        ns
    }
}
