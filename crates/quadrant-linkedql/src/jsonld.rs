//! JSON-LD codec for typed values.
//!
//! References encode as `{"@id": ...}` and literals as `{"@value": ...}` with
//! `@type` or `@language` when present. Datatype IRIs are compacted through
//! the prefix table; the default prefixes are always available for this.

use serde_json::{json, Map, Value as Json};
use std::sync::OnceLock;

use quadrant_store::value::{SCHEMA_BOOLEAN, SCHEMA_FLOAT, SCHEMA_INTEGER};
use quadrant_store::{Namespaces, Value};

use crate::error::{QueryError, Result};

fn default_namespaces() -> &'static Namespaces {
    static DEFAULT: OnceLock<Namespaces> = OnceLock::new();
    DEFAULT.get_or_init(Namespaces::with_default_prefixes)
}

fn compact_datatype(datatype: &str, ns: &Namespaces) -> String {
    let short = ns.short_iri(datatype);
    if short != datatype {
        return short;
    }
    default_namespaces().short_iri(datatype)
}

/// Encode a value in its wire form.
pub fn to_jsonld(value: &Value, ns: &Namespaces) -> Json {
    match value {
        Value::Iri(iri) => json!({ "@id": iri }),
        Value::BlankNode(_) => json!({ "@id": value.lexical() }),
        Value::String(s) => json!({ "@value": s }),
        Value::LangString { value, language } => {
            json!({ "@value": value, "@language": language })
        }
        Value::TypedString { .. } | Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
            let datatype = value.datatype().unwrap_or_default();
            json!({
                "@value": value.lexical(),
                "@type": compact_datatype(datatype, ns),
            })
        }
    }
}

/// Decode a JSON-LD value object or a bare JSON scalar into a value.
///
/// Strings that carry no `@`-wrapper are plain string literals; IRIs must be
/// given as `{"@id": ...}`. Names are expanded through `ns`.
pub fn from_jsonld(json: &Json, ns: &Namespaces) -> Result<Value> {
    match json {
        Json::String(s) => Ok(Value::string(s.clone())),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => number(n),
        Json::Object(obj) => from_object(obj, ns),
        Json::Null | Json::Array(_) => Err(QueryError::configuration(format!(
            "{json} is not a JSON-LD value"
        ))),
    }
}

/// `_:label` names a blank node, anything else an IRI (left unexpanded).
pub(crate) fn node_reference(id: &str) -> Value {
    match id.strip_prefix("_:") {
        Some(label) => Value::BlankNode(label.to_string()),
        None => Value::iri(id),
    }
}

fn number(n: &serde_json::Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| QueryError::configuration(format!("number {n} is out of range")))
}

fn from_object(obj: &Map<String, Json>, ns: &Namespaces) -> Result<Value> {
    if let Some(id) = obj.get("@id") {
        let id = id
            .as_str()
            .ok_or_else(|| QueryError::configuration("@id must be a string"))?;
        return Ok(ns.expand_value(&node_reference(id)));
    }

    let raw = obj
        .get("@value")
        .ok_or_else(|| QueryError::configuration("value object needs @id or @value"))?;

    if let Some(language) = obj.get("@language").and_then(Json::as_str) {
        let value = raw
            .as_str()
            .ok_or_else(|| QueryError::configuration("@language requires a string @value"))?;
        return Ok(Value::LangString {
            value: value.to_string(),
            language: language.to_string(),
        });
    }

    let Some(datatype) = obj.get("@type").and_then(Json::as_str) else {
        return from_jsonld(raw, ns);
    };
    let datatype = ns.full_iri(datatype);
    let lexical = match raw {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    };
    let parsed = match datatype.as_str() {
        SCHEMA_INTEGER => lexical.parse().ok().map(Value::Int),
        SCHEMA_FLOAT => lexical.parse().ok().map(Value::Float),
        SCHEMA_BOOLEAN => lexical.parse().ok().map(Value::Bool),
        _ => None,
    };
    Ok(parsed.unwrap_or(Value::TypedString {
        value: lexical,
        datatype,
    }))
}
