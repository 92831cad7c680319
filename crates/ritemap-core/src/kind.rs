//! The closed set of node kinds and their per-kind document fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Kind of a narrative node. Doubles as the directory name under the config root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Event,
    Rite,
}

/// Which document fields feed a node's display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFields {
    /// Field holding the human-facing label.
    pub label: &'static str,
    /// Field holding the description, if the kind has one.
    pub description: Option<&'static str>,
}

const EVENT_FIELDS: KindFields = KindFields {
    label: "text",
    description: None,
};

const RITE_FIELDS: KindFields = KindFields {
    label: "name",
    description: Some("text"),
};

impl NodeKind {
    pub const ALL: [Self; 2] = [Self::Event, Self::Rite];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Rite => "rite",
        }
    }

    #[must_use]
    pub const fn fields(self) -> KindFields {
        match self {
            Self::Event => EVENT_FIELDS,
            Self::Rite => RITE_FIELDS,
        }
    }

    /// Parse a directory name, returning `None` for anything outside the kind set.
    #[must_use]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dir_name(s).ok_or_else(|| ExtractError::UnknownNodeKind(s.to_string()))
    }
}
