//! Node loading against an on-disk config tree.

use std::fs;
use std::path::Path;

use ritemap_core::{ActionResolver, ExtractError, Loader, Node, NodeId, NodeKind};
use tempfile::TempDir;

fn write_doc(root: &Path, kind: &str, id: &str, body: &str) {
    let dir = root.join(kind);
    fs::create_dir_all(&dir).expect("create kind dir");
    fs::write(dir.join(format!("{id}.json")), body).expect("write document");
}

fn load_children(node: &Node, loader: &Loader) -> Result<Vec<Node>, ExtractError> {
    node.child_ids(&ActionResolver::strict())?
        .into_iter()
        .map(|child| Node::load(loader, child.kind, &child.id))
        .collect()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write_doc(
        dir.path(),
        "event",
        "1",
        r#"{
            // opening beat
            "text": "The caravan arrives",
            "settlement": [{"action": {"rite": "2", "event_on": 1}}]
        }"#,
    );
    write_doc(
        dir.path(),
        "rite",
        "2",
        r#"{"name": "Market Day", "text": "Trade with strangers.", "settlement": []}"#,
    );
    dir
}

#[test]
fn loads_children_with_metadata() {
    let dir = fixture();
    let loader = Loader::new(dir.path());

    let event = Node::load(&loader, NodeKind::Event, "1").expect("load event");
    assert_eq!(event.readable_id().expect("label"), "The caravan arrives");

    let children = load_children(&event, &loader).expect("children");
    assert_eq!(children.len(), 1);
    let rite = &children[0];
    assert_eq!(rite.node_id(), NodeId::rite("2"));
    assert_eq!(rite.readable_id().expect("label"), "Market Day");
    assert_eq!(rite.description().expect("description"), "Trade with strangers.");
    assert!(rite.path().ends_with("rite/2.json"));
}

#[test]
fn missing_child_document_is_not_found() {
    let dir = fixture();
    write_doc(
        dir.path(),
        "event",
        "3",
        r#"{"text": "Dead end", "settlement": [{"action": {"event": 99}}]}"#,
    );
    let loader = Loader::new(dir.path());
    let event = Node::load(&loader, NodeKind::Event, "3").expect("load event");

    let err = load_children(&event, &loader).unwrap_err();
    assert!(
        matches!(err, ExtractError::NotFound { kind: NodeKind::Event, ref id, .. } if id == "99"),
        "got {err:?}"
    );
}

#[test]
fn lenient_resolver_tolerates_unknown_keys() {
    let dir = fixture();
    write_doc(
        dir.path(),
        "event",
        "4",
        r#"{"text": "Odd", "settlement": [{"action": {"summon": 3, "rite": 2}}]}"#,
    );
    let loader = Loader::new(dir.path());
    let event = Node::load(&loader, NodeKind::Event, "4").expect("load event");

    assert!(event.child_ids(&ActionResolver::strict()).is_err());
    let children = event
        .child_ids(&ActionResolver::lenient())
        .expect("lenient children");
    assert_eq!(children.into_iter().collect::<Vec<_>>(), [NodeId::rite("2")]);
}
