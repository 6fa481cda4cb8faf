use super::error::DiError;
use crate::config::{load_document, LoadError};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BLOCK_RAW: &str = "raw";
const BLOCK_CLASS: &str = "class";
const BLOCK_INCLUDE: &str = "include";

/// Parsed dependency document: the `raw` and `class` tables plus an
/// optional `include` pointing at a parent document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    raw: Mapping,
    class: Mapping,
    include: Option<String>,
}

impl ConfigDocument {
    /// Build a document from an already parsed value tree. `null` is an
    /// empty document.
    pub fn from_value(value: Value) -> Result<Self, DiError> {
        let mut root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(root) => root,
            other => {
                return Err(DiError::bad_format(format!(
                    "document root must be a mapping, found {}",
                    kind_of(&other)
                )))
            }
        };

        let raw = take_table(&mut root, BLOCK_RAW)?;
        let class = take_table(&mut root, BLOCK_CLASS)?;
        let include = match root.remove(BLOCK_INCLUDE) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                return Err(DiError::bad_format(format!(
                    "\"{BLOCK_INCLUDE}\" must be a path, found {}",
                    kind_of(&other)
                )))
            }
        };

        Ok(Self {
            raw,
            class,
            include,
        })
    }

    /// Parse YAML text (tests and embedded configuration).
    pub fn from_yaml_str(content: &str) -> Result<Self, DiError> {
        let value = crate::config::parse_document(content, crate::config::DocumentFormat::Yaml)
            .map_err(DiError::bad_format)?;
        Self::from_value(value)
    }

    /// Load the document at `path` and, when it names an `include`, merge the
    /// parent's tables underneath its own.
    ///
    /// The include path is relative to the including file's directory. Only
    /// one level is followed: the parent's own `include` is ignored.
    pub fn load(path: &Path) -> Result<Self, DiError> {
        let mut document = Self::read(path)?;

        if let Some(include) = document.include.clone() {
            let parent_path = path
                .parent()
                .map_or_else(|| PathBuf::from(&include), |dir| dir.join(&include));
            let parent = Self::read(&parent_path)?;
            document.merge_parent(parent);
            debug!(
                path = %path.display(),
                include = %parent_path.display(),
                "Parent dependency document merged"
            );
        }

        info!(
            path = %path.display(),
            classes = document.class.len(),
            raw = document.raw.len(),
            "Dependency document loaded"
        );
        Ok(document)
    }

    fn read(path: &Path) -> Result<Self, DiError> {
        let value = load_document(path).map_err(|err| match err {
            LoadError::Unreadable { path, source } => DiError::FileNotFound { path, source },
            malformed @ LoadError::Malformed { .. } => DiError::bad_format(malformed.to_string()),
        })?;
        Self::from_value(value)
    }

    /// Put `parent`'s tables underneath this document's. Names defined here
    /// win; the merge is per top-level name, never deep.
    pub fn merge_parent(&mut self, parent: ConfigDocument) {
        self.class = merge_tables(parent.class, std::mem::take(&mut self.class));
        self.raw = merge_tables(parent.raw, std::mem::take(&mut self.raw));
    }

    #[must_use]
    pub fn class_entry(&self, name: &str) -> Option<&Value> {
        self.class.get(name)
    }

    #[must_use]
    pub fn raw_entry(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    #[must_use]
    pub fn include(&self) -> Option<&str> {
        self.include.as_deref()
    }

    /// Names in the class table, in document order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.class.keys().filter_map(Value::as_str)
    }

    /// Names in the raw table, in document order.
    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().filter_map(Value::as_str)
    }
}

fn take_table(root: &mut Mapping, block: &str) -> Result<Mapping, DiError> {
    match root.remove(block) {
        None | Some(Value::Null) => Ok(Mapping::new()),
        Some(Value::Mapping(table)) => Ok(table),
        Some(other) => Err(DiError::bad_format(format!(
            "\"{block}\" must be a mapping, found {}",
            kind_of(&other)
        ))),
    }
}

fn merge_tables(base: Mapping, overrides: Mapping) -> Mapping {
    let mut merged = base;
    for (name, entry) in overrides {
        merged.insert(name, entry);
    }
    merged
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_entries_win_on_merge() {
        let mut child = ConfigDocument::from_yaml_str(
            r#"
include: base.yaml
class:
  mailer: { class: SmtpMailer }
raw:
  greeting: hello
"#,
        )
        .unwrap();
        let parent = ConfigDocument::from_yaml_str(
            r#"
class:
  mailer: { class: NullMailer }
  logger: { class: Logger }
raw:
  greeting: hi
  limit: 10
"#,
        )
        .unwrap();

        child.merge_parent(parent);

        let mailer = child.class_entry("mailer").unwrap();
        assert_eq!(mailer["class"].as_str(), Some("SmtpMailer"));
        assert!(child.class_entry("logger").is_some());
        assert_eq!(child.raw_entry("greeting").unwrap().as_str(), Some("hello"));
        assert_eq!(child.raw_entry("limit").unwrap().as_i64(), Some(10));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut child =
            ConfigDocument::from_yaml_str("raw:\n  db: { host: child }\n").unwrap();
        let parent =
            ConfigDocument::from_yaml_str("raw:\n  db: { host: parent, port: 5432 }\n").unwrap();
        child.merge_parent(parent);

        let db = child.raw_entry("db").unwrap();
        assert_eq!(db["host"].as_str(), Some("child"));
        assert!(db.get("port").is_none());
    }

    #[test]
    fn test_rejects_non_mapping_root() {
        let err = ConfigDocument::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DiError::BadFormat { .. }));
    }

    #[test]
    fn test_empty_document() {
        let doc = ConfigDocument::from_yaml_str("").unwrap();
        assert_eq!(doc.class_names().count(), 0);
        assert!(doc.include().is_none());
    }
}
