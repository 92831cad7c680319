//! Loaded event and rite nodes.
//!
//! A [`Node`] is a `(kind, id)` pair plus the document it was loaded from.
//! Kind-specific behaviour is limited to which fields supply the label and
//! description (see [`NodeKind::fields`]); child enumeration is shared.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::error;

use crate::action::ActionResolver;
use crate::error::ExtractError;
use crate::kind::NodeKind;
use crate::loader::{Document, Loader};
use crate::node_id::NodeId;

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    id: String,
    document: Document,
}

impl Node {
    /// Load the node for `(kind, id)` through `loader`.
    ///
    /// # Errors
    ///
    /// Propagates loader errors (`NotFound`, `Parse`, `Schema`, `Io`).
    pub fn load(loader: &Loader, kind: NodeKind, id: &str) -> Result<Self, ExtractError> {
        let document = loader.load(kind, id)?;
        Ok(Self::from_document(kind, id, document))
    }

    #[must_use]
    pub fn from_document(kind: NodeKind, id: impl Into<String>, document: Document) -> Self {
        Self {
            kind,
            id: id.into(),
            document,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.document.path()
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Human-facing label: an event's narrative `text`, a rite's `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Schema`] if the label field is missing.
    pub fn readable_id(&self) -> Result<String, ExtractError> {
        self.document.text_field(self.kind.fields().label)
    }

    /// Description text. Events have none and yield an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Schema`] if a rite lacks its `text` field.
    pub fn description(&self) -> Result<String, ExtractError> {
        match self.kind.fields().description {
            Some(field) => self.document.text_field(field),
            None => Ok(String::new()),
        }
    }

    /// Identity without metadata.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.kind, self.id.clone())
    }

    /// Identity carrying this node's readable id and description.
    ///
    /// # Errors
    ///
    /// Propagates [`Node::readable_id`] / [`Node::description`] failures.
    pub fn annotated_id(&self) -> Result<NodeId, ExtractError> {
        Ok(self
            .node_id()
            .with_metadata(self.readable_id()?, self.description()?))
    }

    /// Every node referenced from this document's settlement actions.
    ///
    /// Deduplicated by identity and ordered by `(kind, id)`. A resolver
    /// failure is logged with the document path and key, then returned.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Schema`] for a malformed settlement and
    /// [`ExtractError::UnrecognizedActionKind`] /
    /// [`ExtractError::MalformedAction`] from the resolver.
    pub fn child_ids(&self, resolver: &ActionResolver) -> Result<BTreeSet<NodeId>, ExtractError> {
        let mut children = BTreeSet::new();
        for action in self.document.actions()? {
            for (key, value) in action {
                match resolver.resolve(key, value) {
                    Ok(found) => children.extend(found),
                    Err(err) => {
                        error!(
                            path = %self.path().display(),
                            key = key.as_str(),
                            error = %err,
                            "invalid action entry"
                        );
                        return Err(err.in_document(self.path()));
                    }
                }
            }
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind, body: &str) -> Node {
        let path = format!("config/{kind}/1.json");
        Node::from_document(kind, "1", Document::parse(path, body).expect("parse"))
    }

    #[test]
    fn event_metadata() {
        let event = node(NodeKind::Event, r#"{"text": "Rain at dusk", "settlement": []}"#);
        assert_eq!(event.readable_id().expect("label"), "Rain at dusk");
        assert_eq!(event.description().expect("description"), "");
    }

    #[test]
    fn rite_metadata() {
        let rite = node(
            NodeKind::Rite,
            r#"{"name": "Night Feast", "text": "Guests gather.", "settlement": []}"#,
        );
        assert_eq!(rite.readable_id().expect("label"), "Night Feast");
        assert_eq!(rite.description().expect("description"), "Guests gather.");
        let annotated = rite.annotated_id().expect("annotated");
        assert_eq!(annotated.readable_id, "Night Feast");
        assert_eq!(annotated, NodeId::rite("1"));
    }

    #[test]
    fn children_are_deduplicated_across_settlements() {
        let event = node(
            NodeKind::Event,
            r#"{"text": "t", "settlement": [
                {"action": {"rite": 2, "event_on": [3, 3]}},
                {"action": {"success": {"rite": "2"}, "option": "x"}}
            ]}"#,
        );
        let children = event.child_ids(&ActionResolver::strict()).expect("children");
        let expected: BTreeSet<NodeId> = [NodeId::event("3"), NodeId::rite("2")].into();
        assert_eq!(children, expected);
    }

    #[test]
    fn child_ids_are_deterministic() {
        let event = node(
            NodeKind::Event,
            r#"{"text": "t", "settlement": [{"action": {"event": [9, 4, 7], "rite": 1}}]}"#,
        );
        let resolver = ActionResolver::strict();
        let first = event.child_ids(&resolver).expect("first");
        let second = event.child_ids(&resolver).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn unrecognized_key_reports_document_path() {
        let event = node(
            NodeKind::Event,
            r#"{"text": "t", "settlement": [{"action": {"rite": 2, "warp_drive": 1}}]}"#,
        );
        let err = event.child_ids(&ActionResolver::strict()).unwrap_err();
        match err {
            ExtractError::UnrecognizedActionKind { key, path } => {
                assert_eq!(key, "warp_drive");
                assert_eq!(path, Path::new("config/event/1.json"));
            }
            other => panic!("expected UnrecognizedActionKind, got {other:?}"),
        }
    }
}
