//! Graph pattern compiler.
//!
//! A pattern is a JSON-LD node object. Each key adds one or more clauses,
//! all relative to the matched vertex (`Placeholder`):
//!
//! - `@id`: the vertex is one of the given IRIs (`Is`).
//! - `@type`: the vertex has `rdf:type` set to each given IRI (`Has`).
//! - any other key is a property. A value object (`{"@id": ..}` alone, or
//!   anything with `@value`) or a bare scalar becomes `Has`; a nested node
//!   object becomes a nested `Match` reached by visiting the property.
//!   Arrays add one clause per element.
//!
//! The clauses are conjunctive and end up in a single `Where`.

use serde_json::{Map, Value as Json};

use quadrant_store::value::RDF_NS;
use quadrant_store::{Namespaces, Value as QuadValue};

use crate::error::{QueryError, Result};
use crate::jsonld::{from_jsonld, node_reference};
use crate::step::{self, Has, Is, Match, Placeholder, PropertyPath, Step, Visit};

pub type GraphPattern = Map<String, Json>;

pub(crate) fn compile_pattern(pattern: &GraphPattern, ns: &Namespaces) -> Result<Vec<Step>> {
    let mut clauses = Vec::new();
    for (key, value) in pattern {
        match key.as_str() {
            "@id" => clauses.push(
                Is {
                    from: step::from(Placeholder),
                    values: references(key, value)?,
                }
                .into(),
            ),
            "@type" => {
                for class in references(key, value)? {
                    clauses.push(has(&format!("{RDF_NS}type"), class));
                }
            }
            keyword if keyword.starts_with('@') => {
                return Err(QueryError::configuration(format!(
                    "unsupported pattern keyword {keyword}"
                )))
            }
            property => property_clauses(property, value, ns, &mut clauses)?,
        }
    }
    Ok(clauses)
}

fn property_clauses(
    property: &str,
    value: &Json,
    ns: &Namespaces,
    out: &mut Vec<Step>,
) -> Result<()> {
    match value {
        Json::Null => Err(QueryError::configuration(format!(
            "pattern property {property} is null"
        ))),
        Json::Array(items) if items.is_empty() => Err(QueryError::configuration(format!(
            "pattern property {property} has no values"
        ))),
        Json::Array(items) => {
            for item in items {
                property_clauses(property, item, ns, out)?;
            }
            Ok(())
        }
        Json::Object(node) if !is_value_object(node) => {
            out.push(
                Match {
                    from: step::from(Visit {
                        from: step::from(Placeholder),
                        properties: PropertyPath::iris([property]),
                    }),
                    pattern: node.clone(),
                }
                .into(),
            );
            Ok(())
        }
        literal => {
            out.push(has(property, from_jsonld(literal, ns)?));
            Ok(())
        }
    }
}

fn is_value_object(obj: &Map<String, Json>) -> bool {
    obj.contains_key("@value") || (obj.len() == 1 && obj.contains_key("@id"))
}

fn has(property: &str, value: QuadValue) -> Step {
    Has {
        from: step::from(Placeholder),
        property: PropertyPath::iris([property]),
        values: vec![value],
    }
    .into()
}

/// `"id"` or `["id", ...]`, each an IRI or a `_:` blank node.
fn references(key: &str, value: &Json) -> Result<Vec<QuadValue>> {
    let strings: Vec<&Json> = match value {
        Json::Array(items) if !items.is_empty() => items.iter().collect(),
        Json::String(_) => vec![value],
        _ => {
            return Err(QueryError::configuration(format!(
                "{key} must be a string or a non-empty array of strings"
            )))
        }
    };
    strings
        .into_iter()
        .map(|item| {
            item.as_str()
                .map(node_reference)
                .ok_or_else(|| QueryError::configuration(format!("{key} values must be strings")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pattern(json: Json) -> GraphPattern {
        match json {
            Json::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn id_compiles_to_is() {
        let ns = Namespaces::new();
        let clauses = compile_pattern(&pattern(json!({"@id": ["a", "b"]})), &ns).unwrap();
        assert_eq!(
            clauses,
            vec![Step::Is(Is {
                from: step::from(Placeholder),
                values: vec![QuadValue::iri("a"), QuadValue::iri("b")],
            })]
        );
    }

    #[test]
    fn blank_node_ids_stay_blank_nodes() {
        let ns = Namespaces::new();
        let clauses = compile_pattern(&pattern(json!({"@id": "_:b0"})), &ns).unwrap();
        assert_eq!(
            clauses,
            vec![Step::Is(Is {
                from: step::from(Placeholder),
                values: vec![QuadValue::BlankNode("b0".into())],
            })]
        );
    }

    #[test]
    fn arrays_add_one_clause_per_value() {
        let ns = Namespaces::new();
        let clauses =
            compile_pattern(&pattern(json!({"likes": [{"@id": "a"}, "b", 3]})), &ns).unwrap();
        assert_eq!(clauses.len(), 3);
        assert!(clauses.iter().all(|c| matches!(c, Step::Has(_))));
    }

    #[test]
    fn nested_objects_become_nested_matches() {
        let ns = Namespaces::new();
        let clauses =
            compile_pattern(&pattern(json!({"likes": {"name": "Bob"}})), &ns).unwrap();
        assert!(matches!(&clauses[..], [Step::Match(_)]));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        let ns = Namespaces::new();
        for bad in [
            json!({"likes": null}),
            json!({"likes": []}),
            json!({"@id": 3}),
            json!({"@reverse": {}}),
        ] {
            let err = compile_pattern(&pattern(bad), &ns).unwrap_err();
            assert!(matches!(err, QueryError::Configuration(_)));
        }
    }
}
