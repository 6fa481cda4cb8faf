//! # Dispatcher Module
//!
//! Turns a matched route into a controller method call.
//!
//! ## Request Flow
//!
//! 1. The resolver matches `Settings::document_uri` against the route table
//! 2. Routes flagged `ajax: true` only accept POST requests carrying
//!    `X-Requested-With: XMLHttpRequest`; anything else is a bad request and
//!    no controller is built
//! 3. The route's `Type::method` handler is split, `Type` is looked up in the
//!    [`TypeRegistry`](crate::registry::TypeRegistry) and a fresh controller
//!    is built from a [`ControllerInit`]
//! 4. The controller gets the site root as its base directory and the
//!    method runs with the captured path parameters
//!
//! ## Controllers
//!
//! Any type implementing [`Controller`] can be registered. Most embed a
//! [`ControllerContext`] for directories, dependencies and URL helpers:
//!
//! ```rust,ignore
//! use routewire::dispatcher::{Controller, ControllerContext, Dispatcher};
//!
//! registry.register_controller("User", |init| UserController {
//!     ctx: ControllerContext::new(init),
//! });
//!
//! let response = Dispatcher::new(routes, registry, settings, "dev")
//!     .with_request(request)
//!     .handle()?;
//! ```
//!
//! ## Error Handling
//!
//! Every failure surfaces as a [`RouteError`](crate::router::RouteError);
//! use `status_code()` to map it to 404, 400 or 500.

mod context;
mod core;

pub use context::{ControllerContext, ControllerInit, RouteContext};
pub use core::{ajax_guard, Controller, Dispatcher, HANDLER_SEPARATOR};
