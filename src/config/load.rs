use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from the file extension. Anything that is not `.json`
    /// is treated as YAML, which also accepts most JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => f.write_str("YAML"),
            DocumentFormat::Json => f.write_str("JSON"),
        }
    }
}

/// Failure to turn a file into a value tree.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file \"{}\" cannot be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file \"{}\" is not valid {format}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },
}

impl LoadError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Unreadable { path, .. } | LoadError::Malformed { path, .. } => path,
        }
    }
}

/// Parse document text. A blank document yields `Value::Null`.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        // Deserializing straight into the YAML value keeps JSON object key order.
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Read and parse the document at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let format = DocumentFormat::from_path(path);
    let value = parse_document(&content, format).map_err(|message| LoadError::Malformed {
        path: path.to_path_buf(),
        format,
        message,
    })?;

    debug!(path = %path.display(), format = %format, "Configuration document parsed");
    Ok(value)
}
