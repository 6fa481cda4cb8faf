//! # Dependency Container
//!
//! Builds application objects from a declarative dependency document.
//!
//! ## Document
//!
//! ```yaml
//! include: di-base.yaml        # parent document, merged underneath
//! raw:
//!   greeting: hi               # returned as-is by `#greeting`
//! class:
//!   formatter:
//!     class: Formatter
//!   greeter:
//!     class: Greeter           # name registered in the TypeRegistry
//!     param: ["@formatter", "#greeting", "@{site.host}"]
//! ```
//!
//! - `raw` entries are plain values, never constructed.
//! - `class` entries name a registered type and its constructor
//!   parameters. Inside `param`, `@name` is another object (or one of the
//!   sentinels `{site.root}`, `{site.host}`, `{run.mode}`) and `#name` is a
//!   raw resource.
//! - With `include`, the parent's `raw` and `class` tables sit underneath the
//!   child's; same-named entries of the child win.
//!
//! ## Lifecycle
//!
//! A [`DependencyContainer`] is created per request. The first
//! `resolve("greeter")` builds the object and every later call on the same
//! container returns that same instance.
//!
//! ```rust,ignore
//! use routewire::di::DependencyContainer;
//!
//! let mut di = DependencyContainer::new("conf/di-dev.yaml", settings, "dev", registry)?;
//! let greeter = di.get::<Greeter>("greeter")?;
//! ```

mod container;
mod document;
mod error;
mod value;

pub use container::{DependencyContainer, RUN_MODE, SITE_HOST, SITE_ROOT};
pub use document::ConfigDocument;
pub use error::DiError;
pub use value::{Arg, Args, Instance};
