//! End-to-end tests: canonical serialization round-trips, the import
//! boundary, and a full editing session against the fake collaborators.
mod common;
use bunki::error::ImportError;
use bunki::prelude::*;
use common::*;

#[test]
fn test_export_import_round_trip() {
    let mut h = harness(template_with(vec![start_node(Branches::new())]));
    let decision = h.graph.add_decision_node();
    let action = h.graph.add_action_node();
    h.graph.connect_branch(decision, "<1>", Some(action));
    h.graph.move_node(action, 120.0, 240.0);

    let json = h.graph.export().expect("serializable");
    let imported = TreeTemplate::from_json(&json).expect("canonical form re-imports");

    assert_eq!(imported, h.graph.template());

    // branch wiring survives the trip
    let branches = imported
        .tree
        .iter()
        .find(|node| node.id() == decision)
        .and_then(Node::branches)
        .expect("decision present");
    assert_eq!(branches.target("<1>"), Some(Some(action)));
}

#[test]
fn test_import_rejects_missing_required_field() {
    // a decision node without its `test` field
    let json = format!(
        r#"{{
            "id": "{}",
            "name": "broken",
            "tree": [
                {{ "type": "start", "id": "{}", "x": 0, "y": 0, "next": {{}} }},
                {{ "type": "decision", "id": "{}", "x": 0, "y": 0, "next": {{}} }}
            ]
        }}"#,
        TreeId::fresh(),
        NodeId::fresh(),
        NodeId::fresh(),
    );

    assert!(TreeTemplate::from_json(&json).is_none());
    assert!(matches!(
        TreeTemplate::parse_json(&json),
        Err(ImportError::JsonParse(_))
    ));
}

#[test]
fn test_import_rejects_unknown_node_type() {
    let json = format!(
        r#"{{
            "id": "{}",
            "name": "broken",
            "tree": [
                {{ "type": "teleport", "id": "{}", "x": 0, "y": 0 }}
            ]
        }}"#,
        TreeId::fresh(),
        NodeId::fresh(),
    );

    assert!(TreeTemplate::from_json(&json).is_none());
}

#[test]
fn test_import_rejects_wrong_start_count() {
    let no_start = format!(
        r#"{{ "id": "{}", "name": "empty", "tree": [] }}"#,
        TreeId::fresh()
    );
    assert!(matches!(
        TreeTemplate::parse_json(&no_start),
        Err(ImportError::StartCount { found: 0 })
    ));

    let two_starts = format!(
        r#"{{
            "id": "{}",
            "name": "double",
            "tree": [
                {{ "type": "start", "id": "{}", "x": 0, "y": 0, "next": {{}} }},
                {{ "type": "start", "id": "{}", "x": 0, "y": 0, "next": {{}} }}
            ]
        }}"#,
        TreeId::fresh(),
        NodeId::fresh(),
        NodeId::fresh(),
    );
    assert!(matches!(
        TreeTemplate::parse_json(&two_starts),
        Err(ImportError::StartCount { found: 2 })
    ));
    assert!(TreeTemplate::from_json(&two_starts).is_none());
}

#[test]
fn test_import_rejects_garbage_without_panicking() {
    assert!(TreeTemplate::from_json("not json at all").is_none());
    assert!(TreeTemplate::from_json("").is_none());
    assert!(TreeTemplate::from_json("[1, 2, 3]").is_none());
}

#[test]
fn test_editing_session_persists_final_state_and_reloads() {
    let template = template_with(vec![start_node(branch_map(&[("begin", None)]))]);
    let tree_id = template.id;
    let mut h = harness(template);
    let start_id = h.graph.nodes()[0].id();

    // build out a small patrol routine
    let decision = h.graph.add_decision_node();
    let advance = h.graph.add_action_node();
    let retreat = h.graph.add_action_node();
    h.graph.connect_branch(start_id, "begin", Some(decision));
    h.graph.connect_branch(decision, "<1>", Some(advance));
    h.graph.connect_branch(decision, "<2>", Some(retreat));
    h.graph.move_node(decision, 0.0, 150.0);
    h.graph.move_node(advance, -120.0, 300.0);
    h.graph.move_node(retreat, 120.0, 300.0);
    h.graph.set_decision_test(decision, "obstacle ahead");

    for node in [start_id, decision, advance, retreat] {
        h.boxes.set(node, screen_box());
    }
    h.graph.update_nodes();

    // dummy + begin + two decision branches
    assert_eq!(h.graph.edges().len(), 4);
    assert!(h.graph.errors().loops.is_empty());

    // the whole burst collapses into one persist of the final state
    assert_eq!(h.timer.fire_pending(), 1);
    assert_eq!(h.store.persist_count(), 1);
    let persisted = h.store.last_persisted().expect("persisted payload");
    assert_eq!(persisted, h.graph.template());

    // a second aggregate loads what the first one saved
    let reloaded = Graph::builder(tree_id, h.store.clone())
        .with_measure(h.boxes.clone())
        .with_timer(h.timer.clone())
        .build()
        .expect("persisted tree reloads");
    assert_eq!(reloaded.template(), h.graph.template());
    assert_eq!(reloaded.edges().len(), 4);
    assert!(reloaded.errors().loops.is_empty());
}
