use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::kind::NodeKind;

/// Machine-readable error codes for operator-facing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DocumentNotFound,
    DocumentParse,
    DocumentSchema,
    ConfigParse,
    UnrecognizedActionKind,
    MalformedAction,
    UnknownNodeKind,
    Io,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DocumentNotFound => "E1001",
            Self::DocumentParse => "E1002",
            Self::DocumentSchema => "E1003",
            Self::ConfigParse => "E1004",
            Self::UnrecognizedActionKind => "E2001",
            Self::MalformedAction => "E2002",
            Self::UnknownNodeKind => "E2003",
            Self::Io => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DocumentNotFound => "Referenced document not found",
            Self::DocumentParse => "Document parse error",
            Self::DocumentSchema => "Document is missing a required field",
            Self::ConfigParse => "Project config parse error",
            Self::UnrecognizedActionKind => "Unrecognized action kind",
            Self::MalformedAction => "Malformed action value",
            Self::UnknownNodeKind => "Unknown node kind",
            Self::Io => "I/O error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::DocumentNotFound => {
                Some("Check the referencing action value or add the missing document.")
            }
            Self::DocumentParse => Some("Fix the JSON syntax of the reported document."),
            Self::DocumentSchema => {
                Some("Event documents need `text` and `settlement`; rites also need `name`.")
            }
            Self::ConfigParse => Some("Fix syntax in ritemap.toml and retry."),
            Self::UnrecognizedActionKind => {
                Some("Classify the key in the action table (reference, container, no-child).")
            }
            Self::MalformedAction => {
                Some("Container actions need a mapping value; references need an id or id list.")
            }
            Self::UnknownNodeKind => Some("Use one of the node kinds: event, rite."),
            Self::Io => Some("Check that the config directory exists and is readable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure of a single action-entry classification.
///
/// Carries no document context; [`ActionError::in_document`] attaches the
/// path of the document that contained the entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unrecognized action kind `{key}`")]
    Unrecognized { key: String },
    #[error("malformed value for action `{key}`: {reason}")]
    Malformed { key: String, reason: String },
}

impl ActionError {
    /// The action key that failed to classify.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Unrecognized { key } | Self::Malformed { key, .. } => key,
        }
    }

    /// Promote into an [`ExtractError`] reported against `path`.
    #[must_use]
    pub fn in_document(self, path: impl Into<PathBuf>) -> ExtractError {
        let path = path.into();
        match self {
            Self::Unrecognized { key } => ExtractError::UnrecognizedActionKind { key, path },
            Self::Malformed { key, reason } => ExtractError::MalformedAction { key, path, reason },
        }
    }
}

/// Errors raised while loading documents and extracting references.
///
/// None of these are recovered locally: each aborts the extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{kind} document `{id}` not found at {}", path.display())]
    NotFound {
        kind: NodeKind,
        id: String,
        path: PathBuf,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid document {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },
    #[error("unrecognized action kind `{key}` in {}", path.display())]
    UnrecognizedActionKind { key: String, path: PathBuf },
    #[error("malformed action `{key}` in {}: {reason}", path.display())]
    MalformedAction {
        key: String,
        path: PathBuf,
        reason: String,
    },
    #[error("unknown node kind `{0}`")]
    UnknownNodeKind(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures reading or parsing the project config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::Io,
            Self::Parse { .. } => ErrorCode::ConfigParse,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

impl ExtractError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::DocumentNotFound,
            Self::Parse { .. } => ErrorCode::DocumentParse,
            Self::Schema { .. } => ErrorCode::DocumentSchema,
            Self::UnrecognizedActionKind { .. } => ErrorCode::UnrecognizedActionKind,
            Self::MalformedAction { .. } => ErrorCode::MalformedAction,
            Self::UnknownNodeKind(_) => ErrorCode::UnknownNodeKind,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::DocumentNotFound,
            ErrorCode::DocumentParse,
            ErrorCode::DocumentSchema,
            ErrorCode::ConfigParse,
            ErrorCode::UnrecognizedActionKind,
            ErrorCode::MalformedAction,
            ErrorCode::UnknownNodeKind,
            ErrorCode::Io,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::UnrecognizedActionKind.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn config_parse_failure_maps_to_config_code() {
        let source = toml::from_str::<toml::Value>("collapse = maybe").unwrap_err();
        let err = ConfigError::Parse {
            path: PathBuf::from("ritemap.toml"),
            source,
        };
        assert_eq!(err.code().code(), "E1004");
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("ritemap.toml"));
    }

    #[test]
    fn action_error_keeps_key_and_gains_path() {
        let err = ActionError::Unrecognized {
            key: "mystery".into(),
        }
        .in_document("config/event/7.json");

        match &err {
            ExtractError::UnrecognizedActionKind { key, path } => {
                assert_eq!(key, "mystery");
                assert_eq!(path, &PathBuf::from("config/event/7.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.code(), ErrorCode::UnrecognizedActionKind);
        assert!(err.to_string().contains("mystery"));
        assert!(err.to_string().contains("config/event/7.json"));
    }
}
