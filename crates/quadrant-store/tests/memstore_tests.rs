//! MemStore + evaluator end-to-end tests

use quadrant_store::*;

fn people() -> MemStore {
    MemStore::from_quads([
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("alice", "name", "Alice", ""),
        Quad::iris("bob", "name", "Bob", ""),
        Quad::iris("bob", "likes", "alice", ""),
    ])
}

fn id(store: &MemStore, iri: &str) -> NodeId {
    store
        .node_of(&Value::iri(iri))
        .unwrap()
        .unwrap_or_else(|| panic!("{iri} not in store"))
}

fn iris(store: &MemStore, path: &Path) -> Vec<String> {
    store
        .execute(path)
        .unwrap()
        .map(|b| store.value_of(b.node).unwrap().unwrap().lexical().into_owned())
        .collect()
}

// ============================================================================
// Store contract
// ============================================================================

#[test]
fn test_nodes_follow_first_seen_order() {
    let store = MemStore::from_quads([Quad::iris("alice", "likes", "bob", "")]);
    assert_eq!(iris(&store, &Path::all()), vec!["alice", "likes", "bob"]);
}

#[test]
fn test_unknown_value_has_no_id() {
    let store = people();
    assert_eq!(store.node_of(&Value::iri("carol")).unwrap(), None);
    assert_eq!(store.node_of(&Value::string("Alice")).unwrap(), None);
}

#[test]
fn test_quads_by_direction() {
    let store = people();
    let alice = id(&store, "alice");
    assert_eq!(store.quads_by(Direction::Subject, alice).unwrap().len(), 2);
    assert_eq!(store.quads_by(Direction::Object, alice).unwrap().len(), 1);
    assert!(store.quads_by(Direction::Label, alice).unwrap().is_empty());
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn test_out_in_both() {
    let store = MemStore::from_quads([
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("bob", "likes", "dan", ""),
    ]);
    let likes = Path::fixed([id(&store, "likes")]);
    let bob = Path::fixed([id(&store, "bob")]);

    assert_eq!(iris(&store, &bob.clone().outgoing(likes.clone())), vec!["dan"]);
    assert_eq!(iris(&store, &bob.clone().incoming(likes.clone())), vec!["alice"]);
    assert_eq!(iris(&store, &bob.both(likes)), vec!["alice", "dan"]);
}

#[test]
fn test_out_via_all_follows_every_predicate() {
    let store = people();
    let path = Path::fixed([id(&store, "alice")]).outgoing(Path::all());
    assert_eq!(iris(&store, &path), vec!["bob", "Alice"]);
}

#[test]
fn test_predicates_are_deduplicated_per_node() {
    let store = MemStore::from_quads([
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("alice", "likes", "dan", ""),
    ]);
    let path = Path::fixed([id(&store, "alice")]).out_predicates();
    assert_eq!(iris(&store, &path), vec!["likes"]);

    let path = Path::all().in_predicates();
    assert_eq!(iris(&store, &path), vec!["likes", "likes"]);
}

#[test]
fn test_save_all_tags_each_predicate() {
    let store = people();
    let path = Path::fixed([id(&store, "bob")]).save_all(false);
    let out: Vec<Binding> = store.execute(&path).unwrap().collect();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].tags.get("name"), Some(&id(&store, "Bob")));
    assert_eq!(out[0].tags.get("likes"), Some(&id(&store, "alice")));
}

#[test]
fn test_save_all_drops_nodes_without_edges() {
    let store = people();
    let path = Path::all().save_all(false);
    let subjects: Vec<NodeId> = store.execute(&path).unwrap().map(|b| b.node).collect();
    assert_eq!(subjects, vec![id(&store, "alice"), id(&store, "bob")]);

    let path = Path::fixed([id(&store, "Alice")]).save_all(false);
    assert_eq!(store.execute(&path).unwrap().count(), 0);
}

#[test]
fn test_has_with_unknown_values_matches_nothing() {
    let store = people();
    let likes = Path::fixed([id(&store, "likes")]);
    let any = Path::all().has(likes.clone(), None);
    assert_eq!(iris(&store, &any), vec!["alice", "bob"]);

    let none = Path::all().has(likes, Some(Vec::new()));
    assert!(iris(&store, &none).is_empty());
}

// ============================================================================
// Joins
// ============================================================================

#[test]
fn test_optional_keeps_unmatched_bindings() {
    let store = MemStore::from_quads([
        Quad::iris("alice", "likes", "bob", ""),
        Quad::iris("alice", "name", "Alice", ""),
        Quad::iris("bob", "name", "Bob", ""),
    ]);
    let name = Path::fixed([id(&store, "name")]);
    let likes = Path::fixed([id(&store, "likes")]);
    let path = Path::all()
        .save(name, "name")
        .optional(Path::here().save(likes, "likes"));

    let out: Vec<Binding> = store.execute(&path).unwrap().collect();
    assert_eq!(out.len(), 2);
    assert!(out[0].tags.contains_key("likes"));
    assert!(!out[1].tags.contains_key("likes"));
    assert!(out[1].tags.contains_key("name"));
}

#[test]
fn test_where_keeps_position_and_accumulates_tags() {
    let store = people();
    let likes = Path::fixed([id(&store, "likes")]);
    let name = Path::fixed([id(&store, "name")]);
    let path = Path::all().where_clauses(vec![
        Path::here().outgoing(likes).tag("friend"),
        Path::here().outgoing(name).tag("name"),
    ]);

    let out: Vec<Binding> = store.execute(&path).unwrap().collect();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].node, id(&store, "alice"));
    assert_eq!(out[0].tags.get("friend"), Some(&id(&store, "bob")));
    assert_eq!(out[0].tags.get("name"), Some(&id(&store, "Alice")));
}

#[test]
fn test_where_without_seed_clause_fails() {
    let store = people();
    let path = Path::here().outgoing(Path::all());
    assert_eq!(store.execute(&path).err(), Some(StoreError::MissingAmbient));
}

// ============================================================================
// Filters and ordering
// ============================================================================

#[test]
fn test_filter_and_order_over_literals() {
    let store = MemStore::from_quads([
        Quad::new(Value::iri("a"), Value::iri("n"), Value::Int(3), None),
        Quad::new(Value::iri("a"), Value::iri("n"), Value::Int(1), None),
        Quad::new(Value::iri("a"), Value::iri("n"), Value::string("x"), None),
    ]);
    let path = Path::all()
        .filter(ValueFilter::compare(CompareOp::GreaterThanEquals, Value::Int(1)))
        .order();
    assert_eq!(iris(&store, &path), vec!["1", "3"]);

    let path = Path::all().order();
    assert_eq!(iris(&store, &path), vec!["a", "n", "x", "1", "3"]);
}
