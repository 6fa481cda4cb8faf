//! # routewire
//!
//! **routewire** is the request-dispatch core of a server application, driven entirely by
//! two configuration files: a dependency file describing how named objects are built, and a
//! route file mapping URL patterns to controller methods.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`di`]** - Dependency container: `raw` resources, `class` entries, `@`/`#` references,
//!   one instance per name per container
//! - **[`router`]** - Route table loading, ordered regex matching and reverse paths
//! - **[`dispatcher`]** - Ajax guard, `Type::method` lookup and controller invocation
//! - **[`registry`]** - Class identifier to constructor table filled at startup
//! - **[`request`]** / **[`response`]** / **[`session`]** - Values exchanged with controllers
//! - **[`config`]** - YAML/JSON document loading
//! - **[`logging`]** / **[`runtime_config`]** - Process setup from the environment
//! - **[`cli`]** - The `routewire` inspection tool
//!
//! ## Request Flow
//!
//! ```text
//! Settings { site_root, http_host, document_uri }
//!         │
//!         ▼
//! RouteResolver::resolve(document_uri) ──► RouteMatch { route, params }
//!         │
//!         ▼
//! ajax guard ──► TypeRegistry lookup ──► Controller::run(method, params)
//!                                              │
//!                                              ▼
//!                         ControllerContext::di() ──► DependencyContainer
//! ```
//!
//! Containers, resolvers and dispatchers are built per request; nothing cached in one is
//! visible to another.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routewire::{Dispatcher, RouteTable, Settings, TypeRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_controller("User", |init| UserController::new(init));
//! let registry = Arc::new(registry);
//! let routes = Arc::new(RouteTable::load("/srv/site/conf/route.yaml")?);
//!
//! // per request
//! let settings = Arc::new(Settings::new("/srv/site", "example.org", "/user/42"));
//! let response = Dispatcher::new(routes, registry, settings, "prod")
//!     .with_request(request)
//!     .handle()?;
//! ```
//!
//! ## Error Handling
//!
//! Dependency failures are [`DiError`]s, routing and dispatch failures are [`RouteError`]s.
//! [`RouteError::status_code`] maps a failure to the HTTP status the boundary layer should send.

pub mod cli;
pub mod config;
pub mod di;
pub mod dispatcher;
pub mod logging;
pub mod registry;
pub mod request;
pub mod response;
pub mod router;
pub mod runtime_config;
pub mod session;
pub mod settings;

pub use di::{DependencyContainer, DiError};
pub use dispatcher::{Controller, ControllerContext, ControllerInit, Dispatcher};
pub use registry::TypeRegistry;
pub use request::RequestContext;
pub use response::Response;
pub use router::{RouteError, RouteResolver, RouteTable};
pub use settings::Settings;
