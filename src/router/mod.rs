//! # Router Module
//!
//! Loads the route file and matches request paths against it.
//!
//! ## Route file
//!
//! The route file is a mapping of route name to route entry, plus two
//! reserved names:
//!
//! ```yaml
//! index:
//!   controller: Home::index
//! user:
//!   regexp: "^/user/{id}$"
//!   vars: { id: "@userId" }
//!   controller: User::show
//! user_save:
//!   regexp: "^/user/{id}/save$"
//!   vars: { id: "[0-9]+" }
//!   ajax: true
//!   controller: User::save
//! vars:
//!   userId: "[0-9]+"
//! ```
//!
//! - `index` is dispatched when the request path is exactly `/`.
//! - `vars` holds global variables; a route variable whose value starts with
//!   `@` takes its value from there.
//!
//! ## Matching
//!
//! Routes are tried in the order they appear in the file and the first one
//! whose (anchored) pattern matches wins. Its capture groups become the
//! positional parameters handed to the controller method; a pattern without
//! explicit groups captures its `{name}` placeholders instead.
//!
//! ```rust,ignore
//! use routewire::router::{RouteResolver, RouteTable};
//! use std::sync::Arc;
//!
//! let table = Arc::new(RouteTable::load("conf/route.yaml")?);
//! let resolver = RouteResolver::new(table);
//! let matched = resolver.resolve("/user/42")?;
//! assert_eq!(matched.route_name(), "user");
//! assert_eq!(matched.param(0), Some("42"));
//! ```
//!
//! ## Reverse paths
//!
//! [`RouteTable::path_for`] turns a route name and placeholder values back
//! into a URL path.

mod core;
mod error;
mod table;
#[cfg(test)]
mod tests;

pub use core::{ParamVec, RouteMatch, RouteResolver, MAX_INLINE_PARAMS};
pub use error::RouteError;
pub use table::{RouteSpec, RouteTable, ROUTE_INDEX, ROUTE_VARS};
