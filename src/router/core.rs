//! Route resolver core - ordered pattern matching.
//!
//! Routes are tried in declaration order and the first match wins. Patterns
//! are only built (variables substituted, regex compiled) when matching first
//! reaches them, so a broken entry behind a matching one never fails a
//! request; once compiled, a pattern is cached for the resolver's lifetime.

use super::error::RouteError;
use super::table::{RouteSpec, RouteTable};
use once_cell::sync::OnceCell;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Maximum number of captured parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Positional parameters captured from the request path.
pub type ParamVec = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// Result of matching a request path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route entry
    pub route: Arc<RouteSpec>,
    /// Captured groups in order; groups that did not participate are empty
    pub params: ParamVec,
}

impl RouteMatch {
    #[must_use]
    pub fn route_name(&self) -> &str {
        self.route.name()
    }

    #[inline]
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Matches request paths against a [`RouteTable`].
pub struct RouteResolver {
    table: Arc<RouteTable>,
    compiled: Vec<OnceCell<Regex>>,
}

impl RouteResolver {
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        let compiled = table.routes().iter().map(|_| OnceCell::new()).collect();
        Self { table, compiled }
    }

    #[must_use]
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Find the route for `path`.
    ///
    /// `/` goes straight to the `index` route when one is configured.
    /// Otherwise routes are tried in order; a route without a pattern or with
    /// an unknown global variable fails the whole lookup when reached.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        debug!(path = %path, "Route match attempt");

        if path == "/" {
            if let Some(index) = self.table.index() {
                info!(path = %path, route_name = %index.name(), "Index route matched");
                return Ok(RouteMatch {
                    route: Arc::clone(index),
                    params: ParamVec::new(),
                });
            }
        }

        let match_start = Instant::now();
        for (route, cell) in self.table.routes().iter().zip(&self.compiled) {
            let regex = cell.get_or_try_init(|| self.compile(route))?;

            if let Some(captures) = regex.captures(path) {
                let params: ParamVec = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                    .collect();

                info!(
                    path = %path,
                    route_name = %route.name(),
                    handler = route.controller().unwrap_or_default(),
                    params = ?params,
                    duration_us = match_start.elapsed().as_micros(),
                    "Route matched"
                );
                return Ok(RouteMatch {
                    route: Arc::clone(route),
                    params,
                });
            }
        }

        warn!(
            path = %path,
            routes_count = self.table.routes().len(),
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        Err(RouteError::NotFound {
            path: path.to_owned(),
        })
    }

    /// Build and compile the anchored pattern of `route`.
    ///
    /// When the substituted pattern has no capture group of its own, each
    /// `{name}` placeholder is captured instead, so `^/user/{id}$` with
    /// `id: "[0-9]+"` still hands `"42"` to the handler.
    fn compile(&self, route: &RouteSpec) -> Result<Regex, RouteError> {
        let regex = anchored(route, &substitute_vars(route, &self.table, false)?)?;
        if regex.captures_len() > 1 || route.vars().is_empty() {
            return Ok(regex);
        }
        anchored(route, &substitute_vars(route, &self.table, true)?)
    }
}

fn anchored(route: &RouteSpec, pattern: &str) -> Result<Regex, RouteError> {
    // Patterns that already carry ^/$ are unaffected.
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
        RouteError::config_invalid(format!(
            "route \"{}\" has an invalid regexp \"{pattern}\": {err}",
            route.name()
        ))
    })
}

/// Replace each `{name}` placeholder of the route's pattern with its value.
/// Values starting with `@` are looked up in the global variables. With
/// `capture` set, each substituted value is wrapped in a capture group.
fn substitute_vars(
    route: &RouteSpec,
    table: &RouteTable,
    capture: bool,
) -> Result<String, RouteError> {
    let mut pattern = route
        .regexp()
        .ok_or_else(|| RouteError::RegexpNotFound {
            route: route.name().to_owned(),
        })?
        .to_owned();

    for (name, value) in route.vars() {
        let value = match value.strip_prefix('@') {
            Some(global) => table.global(global).ok_or_else(|| RouteError::GlobalVarNotFound {
                route: route.name().to_owned(),
                name: global.to_owned(),
            })?,
            None => value.as_str(),
        };
        let placeholder = format!("{{{name}}}");
        pattern = if capture {
            pattern.replace(&placeholder, &format!("({value})"))
        } else {
            pattern.replace(&placeholder, value)
        };
    }

    debug!(route_name = %route.name(), pattern = %pattern, "Route pattern built");
    Ok(pattern)
}
