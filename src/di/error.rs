use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dependency document or building an object.
///
/// Every variant is a configuration or programming error; nothing here is
/// retried.
#[derive(Debug, Error)]
pub enum DiError {
    /// The dependency document (or the document it includes) is unreadable.
    #[error("file \"{}\" not found", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No `class` entry exists under this name.
    #[error("resource \"{name}\" not found in the class table")]
    ClassNameNotFound { name: String },

    /// A class entry, or the document itself, has the wrong shape.
    #[error("bad format: {message}")]
    BadFormat { message: String },

    /// The class entry names no type, or names a type the registry cannot
    /// construct from parameters.
    #[error("name \"{name}\" has no constructible class{}", class_suffix(.class))]
    ClassNotFound { name: String, class: Option<String> },

    /// No `raw` entry exists under this name.
    #[error("raw resource \"{name}\" not found")]
    ResourceNotFound { name: String },

    /// A class's parameters lead back to the class itself.
    #[error("circular dependency: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// The registered factory refused the resolved arguments.
    #[error("failed to construct \"{name}\" as {class}: {source}")]
    Construction {
        name: String,
        class: String,
        #[source]
        source: anyhow::Error,
    },

    /// A typed lookup found an instance of a different type.
    #[error("\"{name}\" is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

fn class_suffix(class: &Option<String>) -> String {
    match class {
        Some(class) => format!(" (\"{class}\" is not registered as a service)"),
        None => String::new(),
    }
}

impl DiError {
    pub(crate) fn bad_format(message: impl Into<String>) -> Self {
        DiError::BadFormat {
            message: message.into(),
        }
    }
}
