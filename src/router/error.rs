use http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a route table, matching a path or dispatching
/// to a controller.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The handler identifier does not split into `Type::method`.
    #[error("bad handler format \"{handler}\" in route \"{route}\", expected Type::method")]
    BadFormat { route: String, handler: String },

    /// The registered type cannot act as a controller.
    #[error("type \"{class}\" does not implement the controller interface")]
    BadInterface { class: String },

    #[error("method \"{method}\" not found in \"{class}\"")]
    MethodNotFound { class: String, method: String },

    /// A route variable refers to a global variable that is not defined.
    #[error("global var \"{name}\" referenced by route \"{route}\" not found")]
    GlobalVarNotFound { route: String, name: String },

    #[error("controller type \"{class}\" not found")]
    ClassNotFound { class: String },

    #[error("failed to open route file \"{}\": {source}", path.display())]
    ErrorToOpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("route configuration is invalid: {reason}")]
    ConfigInvalid { reason: String },

    /// A route without a pattern was reached during matching.
    #[error("regexp not set in route \"{route}\"")]
    RegexpNotFound { route: String },

    #[error("route \"{name}\" not found")]
    RouteNotFound { name: String },

    #[error("name \"{name}\" is reserved")]
    NameIsReserved { name: String },

    /// No route matched the request path.
    #[error("no route matches \"{path}\"")]
    NotFound { path: String },

    /// The request does not satisfy the route's preconditions.
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    /// The controller method itself failed.
    #[error("handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

impl RouteError {
    /// HTTP status the boundary layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::NotFound { .. } => StatusCode::NOT_FOUND,
            RouteError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error is a client-side (4xx) condition rather than a
    /// configuration or programming error.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    pub(crate) fn config_invalid(reason: impl Into<String>) -> Self {
        RouteError::ConfigInvalid {
            reason: reason.into(),
        }
    }
}
