//! # Config Module
//!
//! Reads the structured configuration files that drive the dependency
//! container and the route table.
//!
//! Both file kinds share one reader: the format is picked from the file
//! extension (`.json` is parsed as JSON, everything else as YAML) and the
//! result is an order-preserving [`serde_yaml::Value`] tree. Order matters for
//! route tables, where the first matching route wins.
//!
//! ```rust,ignore
//! use routewire::config::load_document;
//!
//! let value = load_document("conf/route.yaml")?;
//! ```

mod load;

pub use load::{load_document, parse_document, DocumentFormat, LoadError};
