//! Document loading from the `<root>/<kind>/<id>.json` layout.
//!
//! Documents are JSON with comments (`//`, `/* */` and `#`). Comments are
//! stripped with [`json_comments`] before [`serde_json`] parses the body.
//! Nothing is cached here; callers that revisit nodes memoize themselves.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::ExtractError;
use crate::kind::NodeKind;

/// A parsed document and the path it came from.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl Document {
    /// Parse a document body. `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] for malformed content and
    /// [`ExtractError::Schema`] when the top level is not an object.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ExtractError> {
        let path = path.into();
        let stripped = json_comments::StripComments::new(content.as_bytes());
        let value: Value = match serde_json::from_reader(stripped) {
            Ok(value) => value,
            Err(source) => return Err(ExtractError::Parse { path, source }),
        };

        match value {
            Value::Object(fields) => Ok(Self { path, fields }),
            other => Err(ExtractError::Schema {
                path,
                reason: format!("expected a JSON object, found {}", json_type_name(&other)),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Read a required scalar field as text.
    ///
    /// Numbers and booleans are rendered with their JSON spelling.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Schema`] if the field is absent or not a scalar.
    pub fn text_field(&self, field: &str) -> Result<String, ExtractError> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
            Some(other) => Err(self.schema_error(format!(
                "field `{field}` must be text, found {}",
                json_type_name(other)
            ))),
            None => Err(self.schema_error(format!("missing required field `{field}`"))),
        }
    }

    /// The action mapping of every settlement record, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Schema`] if `settlement` is missing or any
    /// record lacks an `action` mapping.
    pub fn actions(&self) -> Result<Vec<&Map<String, Value>>, ExtractError> {
        let settlement = match self.fields.get("settlement") {
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(self.schema_error(format!(
                    "`settlement` must be an array, found {}",
                    json_type_name(other)
                )));
            }
            None => return Err(self.schema_error("missing required field `settlement`".into())),
        };

        settlement
            .iter()
            .enumerate()
            .map(|(index, record)| match record.get("action") {
                Some(Value::Object(action)) => Ok(action),
                Some(other) => Err(self.schema_error(format!(
                    "settlement[{index}].action must be a mapping, found {}",
                    json_type_name(other)
                ))),
                None => Err(self.schema_error(format!("settlement[{index}] has no `action`"))),
            })
            .collect()
    }

    fn schema_error(&self, reason: String) -> ExtractError {
        ExtractError::Schema {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Resolves `(kind, id)` pairs to documents under a config root.
#[derive(Debug, Clone)]
pub struct Loader {
    root: PathBuf,
}

impl Loader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic document path for a node: `<root>/<kind>/<id>.json`.
    #[must_use]
    pub fn path_for(&self, kind: NodeKind, id: &str) -> PathBuf {
        self.root.join(kind.as_str()).join(format!("{id}.json"))
    }

    /// Load and parse the document for `(kind, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NotFound`] if the file does not exist,
    /// [`ExtractError::Parse`] / [`ExtractError::Schema`] for bad content and
    /// [`ExtractError::Io`] for any other read failure.
    #[instrument(skip(self), level = "debug")]
    pub fn load(&self, kind: NodeKind, id: &str) -> Result<Document, ExtractError> {
        let path = self.path_for(kind, id);
        let content = match read_document(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ExtractError::NotFound {
                    kind,
                    id: id.to_string(),
                    path,
                });
            }
            Err(source) => return Err(ExtractError::Io { path, source }),
        };
        debug!(path = %path.display(), bytes = content.len(), "loaded document");
        Document::parse(path, &content)
    }
}

fn read_document(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    #[test]
    fn path_follows_kind_and_id() {
        let loader = Loader::new("config");
        assert_eq!(
            loader.path_for(NodeKind::Rite, "5320511"),
            PathBuf::from("config/rite/5320511.json")
        );
    }

    #[test]
    fn parses_comments() {
        let doc = Document::parse(
            "inline.json",
            r#"{
                // narrative beat
                "text": "A stranger arrives", /* inline */
                # legacy hash comment
                "settlement": []
            }"#,
        )
        .expect("parse commented document");
        assert_eq!(doc.text_field("text").expect("text"), "A stranger arrives");
        assert!(doc.actions().expect("actions").is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let loader = Loader::new(dir.path());
        let err = loader.load(NodeKind::Event, "404").unwrap_err();
        match err {
            ExtractError::NotFound { kind, id, path } => {
                assert_eq!(kind, NodeKind::Event);
                assert_eq!(id, "404");
                assert!(path.ends_with("event/404.json"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "rite/3.json", "{ \"name\": ");
        let err = Loader::new(dir.path())
            .load(NodeKind::Rite, "3")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn non_object_document_is_schema_error() {
        let err = Document::parse("x.json", "[1, 2]").unwrap_err();
        assert!(matches!(err, ExtractError::Schema { .. }));
    }

    #[test]
    fn actions_preserve_document_order() {
        let doc = Document::parse(
            "x.json",
            r#"{"settlement": [{"action": {"zeta": 1, "alpha": 2}}, {"action": {"mid": 3}}]}"#,
        )
        .expect("parse");
        let keys: Vec<&str> = doc
            .actions()
            .expect("actions")
            .into_iter()
            .flat_map(|a| a.keys().map(String::as_str))
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_settlement_is_schema_error() {
        let doc = Document::parse("x.json", r#"{"text": "t"}"#).expect("parse");
        let err = doc.actions().unwrap_err();
        assert!(err.to_string().contains("settlement"));
    }

    #[test]
    fn numeric_text_field_is_rendered() {
        let doc = Document::parse("x.json", r#"{"name": 42}"#).expect("parse");
        assert_eq!(doc.text_field("name").expect("name"), "42");
    }
}
