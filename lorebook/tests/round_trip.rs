//! # Round-Trip Tests
//!
//! Graphs authored through the store, compiled to lorebook JSON and loaded
//! back.

use lorebook::{check_round_trip, compile, Loader, LorebookDocument, LoreEntry};
use serde_json::json;
use world_graph::{
    EdgeKind, EdgePatch, ElementId, GraphStore, NodePatch, NodeType, Position,
};

struct World {
    store: GraphStore,
    forest: ElementId,
    cave: ElementId,
    storm: ElementId,
}

fn keyword_node(store: &mut GraphStore, node_type: NodeType, name: &str, keyword: &str) -> ElementId {
    let id = store.add_node(node_type, None).unwrap();
    store
        .update_element(&id, NodePatch::new().with_name(name).with_keywords([keyword]))
        .unwrap();
    id
}

fn world() -> World {
    let mut store = GraphStore::new();
    let forest = keyword_node(&mut store, NodeType::Location, "Forest", "forest");
    let cave = keyword_node(&mut store, NodeType::Location, "Cave", "cave");
    store.add_sublocation(&forest, "Clearing").unwrap();
    store.add_sublocation(&forest, "Thicket").unwrap();
    let alice = keyword_node(&mut store, NodeType::Character, "Alice", "alice");
    let bob = keyword_node(&mut store, NodeType::Character, "Bob", "bob");
    let storm = keyword_node(&mut store, NodeType::Event, "Storm", "storm");

    store.connect(&forest, &cave, EdgeKind::Adjacent).unwrap();

    let spawn = store.connect(&bob, &forest, EdgeKind::spawn(0.3)).unwrap();
    store
        .update_element(
            &spawn,
            EdgePatch::new().with_sublocation_probabilities([("Clearing", 0.6), ("Thicket", 0.0)]),
        )
        .unwrap();
    store.connect(&alice, &cave, EdgeKind::spawn(0.0)).unwrap();

    let knows = store.connect(&alice, &bob, EdgeKind::knows("siblings")).unwrap();
    store
        .update_element(
            &knows,
            EdgePatch::new()
                .with_source_thinks("lazy")
                .with_target_thinks("bossy"),
        )
        .unwrap();

    store
        .update_element(
            &storm,
            NodePatch::new()
                .with_global(true)
                .with_global_spawn_chance(0.05)
                .with_time_filter(["night"]),
        )
        .unwrap();

    World {
        store,
        forest,
        cave,
        storm,
    }
}

fn find<'e>(entries: &'e [LoreEntry], name: &str) -> &'e LoreEntry {
    entries.iter().find(|entry| entry.name == name).unwrap()
}

#[test]
fn test_compiled_document_shape() {
    let world = world();
    let entries = compile(&world.store.snapshot());
    let value = serde_json::to_value(&entries).unwrap();

    assert_eq!(value[0]["name"], json!("Forest"));
    assert_eq!(value[0]["triggers"], json!(["cave"]));
    assert_eq!(
        value[0]["subLocations"],
        json!({ "Clearing": { "images": {} }, "Thicket": { "images": {} } })
    );
    assert_eq!(value[1]["triggers"], json!(["forest"]));

    let bob = &value[3];
    assert_eq!(bob["name"], json!("Bob"));
    assert_eq!(bob["canSpawnAt"], json!({ "forest": 0.3, "Clearing": 0.6 }));
    assert_eq!(bob["knows"]["alice"], json!({ "relationship": "siblings", "thoughts": "bossy" }));
    assert_eq!(value[2]["canSpawnAt"], json!({ "cave": 0.0 }));

    let storm = &value[4];
    assert_eq!(storm["canSpawnAt"], json!({ "any": 0.05 }));
    assert_eq!(storm["timeFilter"], json!(["night"]));
    assert_eq!(storm["disabledFor"], json!([]));
    assert!(storm.get("subLocations").is_none());
    assert!(storm.get("knows").is_none());
}

#[test]
fn test_compile_load_compile_is_stable() {
    let world = world();
    let entries = compile(&world.store.snapshot());

    let document = serde_json::to_value(LorebookDocument::wrap(entries.clone())).unwrap();
    let outcome = Loader::default().load_value(document).unwrap();
    assert!(outcome.report.is_empty(), "{:?}", outcome.report);

    assert_eq!(compile(&outcome.snapshot), entries);
}

#[test]
fn test_loaded_graph_replaces_store_contents() {
    let world = world();
    let entries = compile(&world.store.snapshot());
    let outcome = Loader::default().load_entries(&entries).unwrap();

    let mut store = GraphStore::new();
    store.add_node(NodeType::Location, Some(Position::new(0.0, 0.0))).unwrap();
    store.load_elements(outcome.snapshot).unwrap();

    assert_eq!(store.node_count(), world.store.node_count());
    assert_eq!(store.edge_count(), world.store.edge_count());

    let next = store.add_node(NodeType::Character, None).unwrap();
    assert!(store.nodes().filter(|node| node.id == next).count() == 1);
    assert_eq!(next.ordinal(), Some(store.node_count() as u64));
}

#[test]
fn test_deleting_a_location_updates_compiled_output() {
    let mut world = world();
    world.store.delete_element(&world.forest).unwrap();

    let entries = compile(&world.store.snapshot());

    assert!(entries.iter().all(|entry| entry.name != "Forest"));
    assert!(find(&entries, "Cave").triggers.is_empty());
    assert!(find(&entries, "Bob").can_spawn_at.as_ref().unwrap().is_empty());
    assert_eq!(find(&entries, "Alice").can_spawn_at.as_ref().unwrap()["cave"], 0.0);
    assert!(world.store.node(&world.cave).is_some());
    assert!(world.store.node(&world.storm).is_some());
}

#[test]
fn test_round_trip_check_on_compiled_output() {
    let world = world();
    let document = serde_json::to_value(compile(&world.store.snapshot())).unwrap();

    let outcome = check_round_trip(&Loader::default(), document).unwrap();

    assert!(outcome.is_consistent(), "{:?}", outcome.mismatches);
}
