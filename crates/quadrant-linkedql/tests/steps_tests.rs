//! Step semantics, one query per step kind.

use quadrant_linkedql::step::{self, *};
use quadrant_linkedql::{CancelToken, PropertyPath, QueryEngine, Step};
use quadrant_store::{MemStore, Namespaces, Quad, Value as QuadValue};
use serde_json::{json, Value as Json};
use std::collections::BTreeMap;

fn single_quad() -> Vec<Quad> {
    vec![Quad::iris("alice", "likes", "bob", "")]
}

fn people() -> Vec<Quad> {
    vec![
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("alice", "name", "Alice", ""),
        Quad::iris("bob", "name", "Bob", ""),
    ]
}

fn example_org() -> Vec<Quad> {
    vec![
        Quad::iris(
            "http://example.org/alice",
            "http://example.org/likes",
            "http://example.org/bob",
            "",
        ),
        Quad::iris(
            "http://example.org/bob",
            "http://example.org/likes",
            "http://example.org/alice",
            "",
        ),
    ]
}

fn literals(values: impl IntoIterator<Item = QuadValue>) -> Vec<Quad> {
    values
        .into_iter()
        .map(|v| Quad::new(QuadValue::iri("alice"), QuadValue::iri("name"), v, None))
        .collect()
}

fn run(data: Vec<Quad>, query: impl Into<Step>) -> Vec<Json> {
    let store = MemStore::from_quads(data);
    let engine = QueryEngine::with_namespaces(&store, Namespaces::new());
    engine
        .execute(&query.into(), &CancelToken::new())
        .expect("query should run")
}

fn id(iri: &str) -> Json {
    json!({ "@id": iri })
}

fn int(lexical: &str) -> Json {
    json!({ "@value": lexical, "@type": "schema:Integer" })
}

fn likes() -> PropertyPath {
    PropertyPath::step(Vertex::iris(["likes"]))
}

fn liker_liked() -> Option<Box<Step>> {
    step::from(As {
        from: step::from(Visit {
            from: step::from(As::named("liker")),
            properties: likes(),
        }),
        name: "liked".into(),
    })
}

// ============================================================================
// Start points
// ============================================================================

#[test]
fn test_entities() {
    let query = Entities {
        identifiers: vec!["alice".into()],
    };
    assert_eq!(run(single_quad(), query), vec![id("alice")]);
}

#[test]
fn test_all_vertices() {
    assert_eq!(
        run(single_quad(), Vertex::all()),
        vec![id("alice"), id("likes"), id("bob")]
    );
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn test_select() {
    let query = Select {
        from: liker_liked(),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"liker": {"@id": "alice"}, "liked": {"@id": "bob"}})]
    );
}

#[test]
fn test_select_with_tags() {
    let query = Select {
        from: liker_liked(),
        tags: vec!["liker".into()],
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"liker": {"@id": "alice"}})]
    );
}

#[test]
fn test_select_first() {
    let query = SelectFirst {
        from: liker_liked(),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"liked": {"@id": "bob"}, "liker": {"@id": "alice"}})]
    );
}

#[test]
fn test_value() {
    let query = Value {
        from: step::from(Visit {
            from: None,
            properties: likes(),
        }),
    };
    assert_eq!(run(single_quad(), query), vec![id("bob")]);
}

// ============================================================================
// Moves
// ============================================================================

#[test]
fn test_back() {
    let query = Back {
        from: step::from(Visit {
            from: step::from(Vertex::iris(["alice"])),
            properties: likes(),
        }),
        name: None,
    };
    assert_eq!(run(single_quad(), query), vec![id("alice")]);
}

#[test]
fn test_both() {
    let data = vec![
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("bob", "likes", "dan", ""),
    ];
    let query = Both {
        from: step::from(Vertex::iris(["bob"])),
        properties: likes(),
    };
    assert_eq!(run(data, query), vec![id("alice"), id("dan")]);
}

#[test]
fn test_visit() {
    let query = Visit {
        from: step::from(Vertex::all()),
        properties: likes(),
    };
    assert_eq!(run(single_quad(), query), vec![id("bob")]);
}

#[test]
fn test_visit_reverse() {
    let query = VisitReverse {
        from: step::from(Vertex::all()),
        properties: likes(),
    };
    assert_eq!(run(single_quad(), query), vec![id("alice")]);
}

#[test]
fn test_property_names() {
    let query = PropertyNames {
        from: step::from(Vertex::all()),
    };
    assert_eq!(run(single_quad(), query), vec![id("likes")]);
}

#[test]
fn test_reverse_property_names() {
    let query = ReversePropertyNames {
        from: step::from(Vertex::all()),
    };
    assert_eq!(run(single_quad(), query), vec![id("likes")]);
}

#[test]
fn test_property_names_as() {
    let query = Select {
        from: step::from(PropertyNamesAs {
            from: step::from(Vertex::all()),
            tag: "predicate".into(),
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"predicate": {"@id": "likes"}})]
    );
}

#[test]
fn test_reverse_property_names_as() {
    let query = Select {
        from: step::from(ReversePropertyNamesAs {
            from: step::from(Vertex::all()),
            tag: "predicate".into(),
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"predicate": {"@id": "likes"}})]
    );
}

#[test]
fn test_properties() {
    let query = Select {
        from: step::from(Properties {
            from: step::from(Vertex::all()),
            names: vec!["likes".into()],
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"likes": {"@id": "bob"}})]
    );
}

#[test]
fn test_reverse_properties() {
    let query = Select {
        from: step::from(ReverseProperties {
            from: step::from(Vertex::all()),
            names: vec!["likes".into()],
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(single_quad(), query),
        vec![json!({"likes": {"@id": "alice"}})]
    );
}

#[test]
fn test_properties_without_names_tags_every_predicate() {
    let query = Select {
        from: step::from(Properties {
            from: step::from(Vertex::iris(["alice"])),
            names: Vec::new(),
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(people(), query),
        vec![json!({"likes": {"@id": "bob"}, "name": {"@id": "Alice"}})]
    );
}

#[test]
fn test_properties_without_names_skip_leaf_nodes() {
    let data = vec![
        Quad::iris("alice", "likes", "bob", ""),
        Quad::new(
            QuadValue::iri("alice"),
            QuadValue::iri("name"),
            QuadValue::string("Alice"),
            None,
        ),
    ];
    let every_property = || {
        step::from(Properties {
            from: step::from(Vertex::all()),
            names: Vec::new(),
        })
    };

    let query = Select {
        from: every_property(),
        tags: Vec::new(),
    };
    assert_eq!(
        run(data.clone(), query),
        vec![json!({"likes": {"@id": "bob"}, "name": {"@value": "Alice"}})]
    );

    let query = Documents {
        from: every_property(),
        grouping: Default::default(),
    };
    assert_eq!(
        run(data, query),
        vec![json!({
            "@id": "alice",
            "likes": [{"@id": "bob"}],
            "name": [{"@value": "Alice"}],
        })]
    );
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_has() {
    let query = Has {
        from: step::from(Vertex::all()),
        property: likes(),
        values: vec![QuadValue::iri("bob")],
    };
    assert_eq!(run(single_quad(), query), vec![id("alice")]);
}

#[test]
fn test_has_reverse() {
    let query = HasReverse {
        from: step::from(Vertex::all()),
        property: likes(),
        values: vec![QuadValue::iri("alice")],
    };
    assert_eq!(run(single_quad(), query), vec![id("bob")]);
}

#[test]
fn test_is() {
    let query = Is {
        from: step::from(Visit {
            from: step::from(Vertex::iris(["alice"])),
            properties: likes(),
        }),
        values: vec![QuadValue::iri("bob")],
    };
    assert_eq!(run(single_quad(), query), vec![id("bob")]);
}

#[test]
fn test_regexp() {
    let data = literals([QuadValue::string("Alice")]);
    let query = RegExp {
        from: step::from(Vertex::all()),
        pattern: "A".into(),
    };
    assert_eq!(run(data, query), vec![json!({"@value": "Alice"})]);
}

#[test]
fn test_like() {
    let query = Like {
        from: step::from(Vertex::all()),
        pattern: "A%".into(),
    };
    assert_eq!(
        run(literals([QuadValue::string("Alice")]), query),
        vec![json!({"@value": "Alice"})]
    );

    // IRIs are not literals, so "alice" is never a candidate
    let query = Like {
        from: step::from(Vertex::all()),
        pattern: "a%".into(),
    };
    assert!(run(literals([QuadValue::string("Alice")]), query).is_empty());
}

#[test]
fn test_less_than() {
    let query = LessThan {
        from: step::from(Vertex::all()),
        value: QuadValue::Int(1),
    };
    let data = literals([QuadValue::Int(0), QuadValue::Int(1)]);
    assert_eq!(run(data, query), vec![int("0")]);
}

#[test]
fn test_greater_than() {
    let query = GreaterThan {
        from: step::from(Vertex::all()),
        value: QuadValue::Int(0),
    };
    let data = literals([QuadValue::Int(0), QuadValue::Int(1)]);
    assert_eq!(run(data, query), vec![int("1")]);
}

#[test]
fn test_less_than_equals() {
    let query = LessThanEquals {
        from: step::from(Vertex::all()),
        value: QuadValue::Int(0),
    };
    let data = literals([QuadValue::Int(-1), QuadValue::Int(0), QuadValue::Int(1)]);
    assert_eq!(run(data, query), vec![int("-1"), int("0")]);
}

#[test]
fn test_greater_than_equals() {
    let query = GreaterThanEquals {
        from: step::from(Vertex::all()),
        value: QuadValue::Int(1),
    };
    let data = literals([QuadValue::Int(0), QuadValue::Int(1), QuadValue::Int(2)]);
    assert_eq!(run(data, query), vec![int("1"), int("2")]);
}

#[test]
fn test_comparison_mixes_numeric_kinds() {
    let query = LessThan {
        from: step::from(Vertex::all()),
        value: QuadValue::Float(0.5),
    };
    let data = literals([QuadValue::Int(0), QuadValue::Int(1), QuadValue::string("0")]);
    assert_eq!(run(data, query), vec![int("0")]);
}

// ============================================================================
// Set algebra, paging, ordering
// ============================================================================

#[test]
fn test_union() {
    let query = Union {
        from: step::from(Vertex::iris(["alice"])),
        steps: vec![Vertex::iris(["bob"]).into()],
    };
    assert_eq!(run(single_quad(), query), vec![id("alice"), id("bob")]);
}

#[test]
fn test_intersect() {
    let data = vec![
        Quad::iris("bob", "likes", "alice", ""),
        Quad::iris("dani", "likes", "alice", ""),
    ];
    let liked_by_bob = || Visit {
        from: step::from(Vertex::iris(["bob"])),
        properties: likes(),
    };
    let query = Intersect {
        from: step::from(liked_by_bob()),
        steps: vec![liked_by_bob().into()],
    };
    assert_eq!(run(data, query), vec![id("alice")]);
}

#[test]
fn test_difference() {
    let query = Difference {
        from: step::from(Vertex::iris(["alice", "likes"])),
        steps: vec![Vertex::iris(["likes"]).into()],
    };
    assert_eq!(run(single_quad(), query), vec![id("alice")]);
}

#[test]
fn test_limit() {
    let query = Limit {
        from: step::from(Vertex::all()),
        limit: 2,
    };
    assert_eq!(run(single_quad(), query), vec![id("alice"), id("likes")]);
}

#[test]
fn test_skip() {
    let query = Skip {
        from: step::from(Vertex::all()),
        offset: 2,
    };
    assert_eq!(run(single_quad(), query), vec![id("bob")]);
}

#[test]
fn test_unique() {
    let query = Unique {
        from: step::from(Vertex::iris(["alice", "alice", "bob"])),
    };
    assert_eq!(run(single_quad(), query), vec![id("alice"), id("bob")]);
}

#[test]
fn test_order() {
    assert_eq!(
        run(single_quad(), Order::default()),
        vec![id("alice"), id("bob"), id("likes")]
    );
}

#[test]
fn test_count() {
    let query = Count {
        from: step::from(Vertex::all()),
    };
    assert_eq!(run(single_quad(), query), vec![int("3")]);
}

// ============================================================================
// Scopes
// ============================================================================

#[test]
fn test_optional() {
    let query = Select {
        from: step::from(Optional {
            from: step::from(Properties {
                from: step::from(Vertex::all()),
                names: vec!["name".into()],
            }),
            step: Box::new(
                Properties {
                    from: step::from(Placeholder),
                    names: vec!["likes".into()],
                }
                .into(),
            ),
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(people(), query),
        vec![
            json!({"likes": {"@id": "bob"}, "name": {"@id": "Alice"}}),
            json!({"name": {"@id": "Bob"}}),
        ]
    );
}

#[test]
fn test_where() {
    let name = || PropertyPath::step(Vertex::iris(["name"]));
    let query = Select {
        from: step::from(As {
            from: step::from(Where {
                from: None,
                steps: vec![
                    As {
                        from: step::from(Visit {
                            from: step::from(Visit {
                                from: step::from(Placeholder),
                                properties: likes(),
                            }),
                            properties: name(),
                        }),
                        name: "likesName".into(),
                    }
                    .into(),
                    As {
                        from: step::from(Visit {
                            from: step::from(Placeholder),
                            properties: name(),
                        }),
                        name: "name".into(),
                    }
                    .into(),
                ],
            }),
            name: "person".into(),
        }),
        tags: Vec::new(),
    };
    assert_eq!(
        run(people(), query),
        vec![json!({
            "person": {"@id": "alice"},
            "name": {"@id": "Alice"},
            "likesName": {"@id": "Bob"},
        })]
    );
}

#[test]
fn test_documents() {
    let mut data = people();
    data.push(Quad::iris("bob", "likes", "alice", ""));
    let query = Documents {
        from: step::from(Properties {
            from: step::from(Vertex::all()),
            names: vec!["name".into(), "likes".into()],
        }),
        grouping: Default::default(),
    };
    assert_eq!(
        run(data, query),
        vec![
            json!({"@id": "alice", "name": [{"@id": "Alice"}], "likes": [{"@id": "bob"}]}),
            json!({"@id": "bob", "name": [{"@id": "Bob"}], "likes": [{"@id": "alice"}]}),
        ]
    );
}

#[test]
fn test_context() {
    let query = Context {
        from: step::from(Has {
            from: None,
            property: PropertyPath::iris(["likes"]),
            values: vec![QuadValue::iri("bob")],
        }),
        rules: BTreeMap::from([
            ("bob".to_string(), "http://example.org/bob".to_string()),
            ("likes".to_string(), "http://example.org/likes".to_string()),
        ]),
    };
    assert_eq!(
        run(example_org(), query),
        vec![id("http://example.org/alice")]
    );
}

#[test]
fn test_match_id() {
    let query = Match {
        from: None,
        pattern: pattern(json!({"@id": "http://example.org/alice"})),
    };
    assert_eq!(
        run(example_org(), query),
        vec![id("http://example.org/alice")]
    );
}

#[test]
fn test_match_blank_node_id() {
    let data = vec![Quad::new(
        QuadValue::BlankNode("b0".into()),
        QuadValue::iri("likes"),
        QuadValue::iri("bob"),
        None,
    )];
    let matched = Match {
        from: None,
        pattern: pattern(json!({"@id": "_:b0"})),
    };
    let is = Is {
        from: None,
        values: vec![QuadValue::BlankNode("b0".into())],
    };
    assert_eq!(run(data.clone(), matched), vec![id("_:b0")]);
    assert_eq!(run(data, is), vec![id("_:b0")]);
}

#[test]
fn test_match_property() {
    let query = Match {
        from: None,
        pattern: pattern(json!({
            "http://example.org/likes": {"@id": "http://example.org/alice"}
        })),
    };
    assert_eq!(
        run(example_org(), query),
        vec![id("http://example.org/bob")]
    );
}

#[test]
fn test_match_nested_pattern() {
    let query = Match {
        from: None,
        pattern: pattern(json!({
            "likes": {"name": {"@id": "Bob"}}
        })),
    };
    assert_eq!(run(people(), query), vec![id("alice")]);
}

fn pattern(json: Json) -> quadrant_linkedql::GraphPattern {
    match json {
        Json::Object(map) => map,
        other => panic!("pattern must be an object, got {other}"),
    }
}
