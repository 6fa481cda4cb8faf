use super::error::RouteError;
use crate::config::{load_document, LoadError};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Route name reserved for the global-variable table.
pub const ROUTE_VARS: &str = "vars";

/// Route name dispatched when the request path is exactly `/`.
pub const ROUTE_INDEX: &str = "index";

const FIELD_REGEXP: &str = "regexp";
const FIELD_VARS: &str = "vars";
const FIELD_CONTROLLER: &str = "controller";
const FIELD_HANDLER: &str = "handler";
const FIELD_AJAX: &str = "ajax";

/// One named entry of the route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    name: String,
    regexp: Option<String>,
    vars: Vec<(String, String)>,
    ajax: bool,
    controller: Option<String>,
}

impl RouteSpec {
    /// Build a route programmatically.
    #[must_use]
    pub fn new(name: impl Into<String>, regexp: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regexp: Some(regexp.into()),
            vars: Vec::new(),
            ajax: false,
            controller: Some(controller.into()),
        }
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_ajax(mut self, ajax: bool) -> Self {
        self.ajax = ajax;
        self
    }

    fn from_value(name: String, value: &Value) -> Result<Self, RouteError> {
        // A non-mapping entry has no pattern; it fails with RegexpNotFound
        // only if matching ever reaches it.
        let Some(entry) = value.as_mapping() else {
            return Ok(Self {
                name,
                regexp: None,
                vars: Vec::new(),
                ajax: false,
                controller: None,
            });
        };

        // `0`, `"0"` and `false` count as no pattern at all.
        let regexp = entry
            .get(FIELD_REGEXP)
            .filter(|value| !matches!(value, Value::Bool(false)))
            .and_then(scalar_to_string)
            .filter(|s| !s.is_empty() && s != "0");

        let vars = match entry.get(FIELD_VARS) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(vars)) => string_pairs(vars, &format!("vars of route \"{name}\""))?,
            Some(_) => {
                return Err(RouteError::config_invalid(format!(
                    "vars of route \"{name}\" must be a mapping"
                )))
            }
        };

        let controller = entry
            .get(FIELD_CONTROLLER)
            .or_else(|| entry.get(FIELD_HANDLER))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let ajax = entry.get(FIELD_AJAX).is_some_and(truthy);

        Ok(Self {
            name,
            regexp,
            vars,
            ajax,
            controller,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern template with `{name}` placeholders, if configured.
    #[must_use]
    pub fn regexp(&self) -> Option<&str> {
        self.regexp.as_deref()
    }

    /// Per-route substitutions, in declaration order.
    #[must_use]
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Whether the route only accepts ajax POST requests.
    #[must_use]
    pub fn ajax(&self) -> bool {
        self.ajax
    }

    /// Handler identifier in `Type::method` form.
    #[must_use]
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }
}

/// Ordered route set loaded from a route file.
///
/// Declaration order is preserved; the resolver tries routes front to back.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    index: Option<Arc<RouteSpec>>,
    routes: Vec<Arc<RouteSpec>>,
    globals: HashMap<String, String>,
}

impl RouteTable {
    /// Load the route file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        let path = path.as_ref();
        let value = load_document(path).map_err(|err| match err {
            LoadError::Unreadable { path, source } => RouteError::ErrorToOpenFile { path, source },
            malformed @ LoadError::Malformed { .. } => RouteError::config_invalid(malformed.to_string()),
        })?;

        let table = Self::from_value(value)
            .map_err(|err| match err {
                RouteError::ConfigInvalid { reason } => {
                    RouteError::config_invalid(format!("{} ({reason})", path.display()))
                }
                other => other,
            })?;

        info!(
            path = %path.display(),
            routes_count = table.routes.len(),
            has_index = table.index.is_some(),
            globals_count = table.globals.len(),
            "Route table loaded"
        );
        Ok(table)
    }

    /// Parse YAML text into a route table.
    pub fn from_yaml_str(content: &str) -> Result<Self, RouteError> {
        let value = crate::config::parse_document(content, crate::config::DocumentFormat::Yaml)
            .map_err(RouteError::config_invalid)?;
        Self::from_value(value)
    }

    /// Build a table from a parsed document. An empty document is invalid.
    pub fn from_value(value: Value) -> Result<Self, RouteError> {
        let root = match value {
            Value::Mapping(root) if !root.is_empty() => root,
            Value::Mapping(_) | Value::Null => {
                return Err(RouteError::config_invalid("route document is empty"))
            }
            _ => return Err(RouteError::config_invalid("route document must be a mapping")),
        };

        let mut table = RouteTable::default();
        for (key, entry) in &root {
            let Some(name) = key.as_str() else {
                return Err(RouteError::config_invalid(format!(
                    "route names must be strings, found {key:?}"
                )));
            };

            match name {
                ROUTE_VARS => {
                    table.globals = match entry {
                        Value::Null => HashMap::new(),
                        Value::Mapping(vars) => string_pairs(vars, "global vars")?.into_iter().collect(),
                        _ => return Err(RouteError::config_invalid("global vars must be a mapping")),
                    };
                }
                ROUTE_INDEX => {
                    let spec = RouteSpec::from_value(name.to_owned(), entry)?;
                    table.index = Some(Arc::new(spec));
                }
                _ => {
                    let spec = RouteSpec::from_value(name.to_owned(), entry)?;
                    table.routes.push(Arc::new(spec));
                }
            }
        }

        Ok(table)
    }

    /// Append a route after the ones already declared.
    pub fn push(&mut self, route: RouteSpec) {
        if route.name == ROUTE_INDEX {
            self.index = Some(Arc::new(route));
        } else {
            self.routes.push(Arc::new(route));
        }
    }

    /// Define a global variable.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(name.into(), value.into());
    }

    /// The `index` route when it names a controller.
    #[must_use]
    pub fn index(&self) -> Option<&Arc<RouteSpec>> {
        self.index.as_ref().filter(|route| route.controller.is_some())
    }

    /// Matchable routes in declaration order (without `index` and `vars`).
    #[must_use]
    pub fn routes(&self) -> &[Arc<RouteSpec>] {
        &self.routes
    }

    #[must_use]
    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }

    /// Find a route by name, `index` included.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<RouteSpec>> {
        if name == ROUTE_INDEX {
            return self.index.as_ref();
        }
        self.routes.iter().find(|route| route.name == name)
    }

    /// Build the URL path for route `name`.
    ///
    /// Each `{key}` placeholder is replaced by its value verbatim (global
    /// variables are not consulted), the `^`/`$` anchors and surrounding
    /// spaces are stripped, and `query` is appended as a form-encoded query
    /// string when non-empty.
    pub fn path_for(
        &self,
        name: &str,
        vars: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<String, RouteError> {
        if name == ROUTE_VARS {
            return Err(RouteError::NameIsReserved {
                name: name.to_owned(),
            });
        }

        let route = self.get(name).ok_or_else(|| RouteError::RouteNotFound {
            name: name.to_owned(),
        })?;

        let mut path = match (route.regexp(), name) {
            (Some(regexp), _) => regexp.to_owned(),
            (None, ROUTE_INDEX) => "/".to_owned(),
            (None, _) => {
                return Err(RouteError::RegexpNotFound {
                    route: name.to_owned(),
                })
            }
        };

        for (key, value) in vars {
            path = path.replace(&format!("{{{key}}}"), value);
        }

        let mut path = path
            .trim_matches(|c: char| c == ' ' || c == '^' || c == '$')
            .to_owned();

        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter())
                .finish();
            path.push('?');
            path.push_str(&encoded);
        }

        Ok(path)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_pairs(mapping: &Mapping, what: &str) -> Result<Vec<(String, String)>, RouteError> {
    mapping
        .iter()
        .map(|(key, value)| {
            let key = key
                .as_str()
                .ok_or_else(|| RouteError::config_invalid(format!("{what}: names must be strings")))?;
            let value = match value {
                Value::Null => String::new(),
                other => scalar_to_string(other).ok_or_else(|| {
                    RouteError::config_invalid(format!("{what}: \"{key}\" must be a scalar"))
                })?,
            };
            Ok((key.to_owned(), value))
        })
        .collect()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}
