//! # CLI Module
//!
//! Command-line tooling for checking route and dependency files.
//!
//! ## Commands
//!
//! ### `match`
//!
//! Match a request path and print the route, handler and captured
//! parameters, or the error with the HTTP status it maps to:
//!
//! ```bash
//! routewire match --routes conf/route.yaml /user/42
//! routewire match --routes conf/route.yaml /user/42/save --method POST --ajax
//! ```
//!
//! ### `path`
//!
//! Build the URL path of a named route:
//!
//! ```bash
//! routewire path --routes conf/route.yaml user --var id=42 --query tab=posts
//! ```
//!
//! ### `inspect-di`
//!
//! List the class and raw names of a dependency file after include
//! merging. Nothing is constructed:
//!
//! ```bash
//! routewire inspect-di --file conf/di-dev.yaml --site-root /srv/site
//! ```
//!
//! Relative paths are resolved against the site root
//! (`ROUTEWIRE_SITE_ROOT`, default the current directory).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
