use super::document::{kind_of, ConfigDocument};
use super::error::DiError;
use super::value::{is_empty_value, Arg, Args, Instance};
use crate::registry::{TypeEntry, TypeRegistry};
use crate::settings::Settings;
use serde_yaml::Value;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Sentinel resolving to the site root directory.
pub const SITE_ROOT: &str = "{site.root}";

/// Sentinel resolving to the HTTP host.
pub const SITE_HOST: &str = "{site.host}";

/// Sentinel resolving to the run mode.
pub const RUN_MODE: &str = "{run.mode}";

const ATTRIBUTE_CLASS: &str = "class";
const ATTRIBUTE_PARAM: &str = "param";

/// Builds objects described by a dependency document and caches them for
/// the container's lifetime.
///
/// A container is meant to live for one request. Each class-backed name is
/// built at most once per container; a fresh container never sees another
/// container's objects.
pub struct DependencyContainer {
    document: ConfigDocument,
    settings: Arc<Settings>,
    run_mode: String,
    registry: Arc<TypeRegistry>,
    objects: HashMap<String, Instance>,
    resolving: Vec<String>,
}

impl DependencyContainer {
    /// Load the document at `path` (relative paths hang off the site root),
    /// merge its include and keep the settings and run mode.
    pub fn new(
        path: impl AsRef<Path>,
        settings: Arc<Settings>,
        run_mode: impl Into<String>,
        registry: Arc<TypeRegistry>,
    ) -> Result<Self, DiError> {
        let path = settings.resolve_path(path);
        let document = ConfigDocument::load(&path)?;
        Ok(Self::from_document(document, settings, run_mode, registry))
    }

    /// Build a container over an already loaded document.
    #[must_use]
    pub fn from_document(
        document: ConfigDocument,
        settings: Arc<Settings>,
        run_mode: impl Into<String>,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            document,
            settings,
            run_mode: run_mode.into(),
            registry,
            objects: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    #[must_use]
    pub fn run_mode(&self) -> &str {
        &self.run_mode
    }

    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Whether `name` has already been built by this container.
    #[must_use]
    pub fn is_built(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Resolve `name`: one of the sentinels, or a class entry built (once)
    /// from its parameters.
    pub fn resolve(&mut self, name: &str) -> Result<Arg, DiError> {
        match name {
            RUN_MODE => return Ok(Arg::Value(Value::String(self.run_mode.clone()))),
            SITE_HOST => {
                return Ok(Arg::Value(Value::String(self.settings.http_host().to_owned())))
            }
            SITE_ROOT => {
                let root = self.settings.site_root().to_string_lossy().into_owned();
                return Ok(Arg::Value(Value::String(root)));
            }
            _ => {}
        }

        if let Some(instance) = self.objects.get(name) {
            debug!(name = %name, "Dependency served from cache");
            return Ok(Arg::Object(instance.clone()));
        }

        self.build(name).map(Arg::Object)
    }

    /// Resolve `name` and downcast the built object to `T`.
    pub fn get<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>, DiError> {
        match self.resolve(name)? {
            Arg::Object(instance) => instance.downcast::<T>(),
            _ => None,
        }
        .ok_or_else(|| DiError::TypeMismatch {
            name: name.to_owned(),
            expected: type_name::<T>(),
        })
    }

    /// Raw resource `name`, exactly as written in the document.
    pub fn raw_resource(&self, name: &str) -> Result<&Value, DiError> {
        self.document
            .raw_entry(name)
            .ok_or_else(|| DiError::ResourceNotFound {
                name: name.to_owned(),
            })
    }

    fn build(&mut self, name: &str) -> Result<Instance, DiError> {
        if self.resolving.iter().any(|n| n == name) {
            let mut chain = self.resolving.clone();
            chain.push(name.to_owned());
            return Err(DiError::CircularDependency { chain });
        }

        let entry = self
            .document
            .class_entry(name)
            .ok_or_else(|| DiError::ClassNameNotFound {
                name: name.to_owned(),
            })?;

        let Value::Mapping(entry) = entry else {
            return Err(DiError::bad_format(format!(
                "class entry \"{name}\" must be a mapping, found {}",
                kind_of(entry)
            )));
        };

        let class = entry
            .get(ATTRIBUTE_CLASS)
            .and_then(Value::as_str)
            .filter(|class| !class.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| DiError::ClassNotFound {
                name: name.to_owned(),
                class: None,
            })?;

        let param = entry.get(ATTRIBUTE_PARAM).cloned();

        self.resolving.push(name.to_owned());
        let args = param.map(|param| self.resolve_value(&param)).transpose();
        self.resolving.pop();
        let args = normalize_args(args?);

        let registry = Arc::clone(&self.registry);
        let factory = match registry.get(&class) {
            Some(TypeEntry::Service(factory)) => factory,
            Some(TypeEntry::Controller(_)) | None => {
                return Err(DiError::ClassNotFound {
                    name: name.to_owned(),
                    class: Some(class),
                })
            }
        };

        debug!(name = %name, class = %class, args = args.len(), "Constructing dependency");
        let instance = factory(args).map_err(|source| DiError::Construction {
            name: name.to_owned(),
            class: class.clone(),
            source,
        })?;

        info!(name = %name, class = %class, "Dependency constructed");
        self.objects.insert(name.to_owned(), instance.clone());
        Ok(instance)
    }

    /// Resolve references inside a `param` value tree.
    ///
    /// Empty values (null, `false`, zero, `""`, empty collections) come back
    /// untouched. `@name` strings resolve through [`Self::resolve`], `#name`
    /// strings through [`Self::raw_resource`]; sequences and mappings are
    /// rebuilt element by element.
    pub fn resolve_value(&mut self, value: &Value) -> Result<Arg, DiError> {
        if is_empty_value(value) {
            return Ok(Arg::Value(value.clone()));
        }

        match value {
            Value::String(s) => {
                if let Some(name) = s.strip_prefix('@') {
                    self.resolve(name)
                } else if let Some(name) = s.strip_prefix('#') {
                    self.raw_resource(name).cloned().map(Arg::Value)
                } else {
                    Ok(Arg::Value(value.clone()))
                }
            }
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Arg::Seq),
            Value::Mapping(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.resolve_value(item)?)))
                .collect::<Result<Vec<_>, DiError>>()
                .map(Arg::Map),
            _ => Ok(Arg::Value(value.clone())),
        }
    }
}

/// Positional-argument normalization: a sequence is the argument list, a
/// missing or null `param` is no arguments, anything else is one argument.
fn normalize_args(param: Option<Arg>) -> Args {
    match param {
        None | Some(Arg::Value(Value::Null)) => Args::default(),
        Some(Arg::Seq(items)) => Args::new(items),
        Some(Arg::Value(Value::Sequence(items))) => {
            Args::new(items.into_iter().map(Arg::Value).collect())
        }
        Some(other) => Args::new(vec![other]),
    }
}
