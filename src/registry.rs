//! Type registry: maps the class identifiers used in configuration files to
//! constructors.
//!
//! The application fills one registry at startup and shares it (behind an
//! `Arc`) with every container and dispatcher it creates. A name is either a
//! service, built by the dependency container from positional arguments, or
//! a controller, built by the dispatcher from the matched route.

use crate::di::{Args, Instance};
use crate::dispatcher::{Controller, ControllerInit};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Builds a service from its resolved `param` list.
pub type ServiceFactory = Box<dyn Fn(Args) -> anyhow::Result<Instance> + Send + Sync>;

/// Builds a controller for one dispatch.
pub type ControllerFactory = Box<dyn Fn(ControllerInit) -> Box<dyn Controller> + Send + Sync>;

/// How a registered name is constructed.
pub enum TypeEntry {
    Service(ServiceFactory),
    Controller(ControllerFactory),
}

impl TypeEntry {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TypeEntry::Service(_) => "service",
            TypeEntry::Controller(_) => "controller",
        }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Class identifier to constructor table.
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service type. The factory receives the resolved `param`
    /// list of the class entry being built.
    ///
    /// ```rust
    /// use routewire::registry::TypeRegistry;
    ///
    /// struct Greeting(String);
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_service("Greeting", |args| Ok(Greeting(args.string(0)?)));
    /// assert!(registry.contains("Greeting"));
    /// ```
    pub fn register_service<T, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(Args) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: ServiceFactory = Box::new(move |args| factory(args).map(Instance::new));
        self.types.insert(name.into(), TypeEntry::Service(factory));
        self
    }

    /// Register a controller type.
    pub fn register_controller<C, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        C: Controller + 'static,
        F: Fn(ControllerInit) -> C + Send + Sync + 'static,
    {
        let factory: ControllerFactory = Box::new(move |init| Box::new(factory(init)));
        self.types.insert(name.into(), TypeEntry::Controller(factory));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.types.iter()).finish()
    }
}
