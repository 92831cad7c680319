//! Node identity with detachable display metadata.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::kind::NodeKind;

/// Identity of a node: `(kind, id)`.
///
/// `readable_id` and `description` travel with the identity for
/// serialization only. Equality, hashing and ordering ignore them, so the
/// same node deduplicates regardless of which edge carried its metadata.
/// An empty string means the metadata is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeId {
    #[serde(rename = "typ")]
    pub kind: NodeKind,
    pub id: String,
    #[serde(default)]
    pub readable_id: String,
    #[serde(default)]
    pub description: String,
}

impl NodeId {
    #[must_use]
    pub fn new(kind: NodeKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            readable_id: String::new(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn event(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Event, id)
    }

    #[must_use]
    pub fn rite(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Rite, id)
    }

    /// Attach display metadata, replacing whatever was carried before.
    #[must_use]
    pub fn with_metadata(
        mut self,
        readable_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.readable_id = readable_id.into();
        self.description = description.into();
        self
    }

    /// Strip display metadata, keeping only the identity.
    #[must_use]
    pub fn bare(&self) -> Self {
        Self::new(self.kind, self.id.clone())
    }

    #[must_use]
    pub fn is_event(&self) -> bool {
        self.kind == NodeKind::Event
    }

    #[must_use]
    pub fn is_rite(&self) -> bool {
        self.kind == NodeKind::Rite
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
