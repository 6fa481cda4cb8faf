//! Dispatcher core - from a matched route to a controller method call.

use super::context::{ControllerInit, RouteContext};
use crate::registry::{TypeEntry, TypeRegistry};
use crate::request::RequestContext;
use crate::response::Response;
use crate::router::{ParamVec, RouteError, RouteResolver, RouteSpec, RouteTable};
use crate::runtime_config::DEFAULT_DI_FILE_PATTERN;
use crate::session::SessionStore;
use crate::settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Separator between type and method in a handler identifier.
pub const HANDLER_SEPARATOR: &str = "::";

/// The capability set every routed handler type provides.
pub trait Controller: Send {
    /// Whether `method` can be passed to [`Controller::run`].
    fn has_method(&self, method: &str) -> bool;

    /// Receives the site root before the method runs.
    fn set_base_dir(&mut self, dir: PathBuf);

    /// Hook called right before [`Controller::run`].
    fn before_call(&mut self, _method: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// Invoke `method` with the captured path parameters in order.
    fn run(&mut self, method: &str, params: ParamVec) -> anyhow::Result<Response>;
}

/// Resolves the request path, applies the ajax guard and invokes the
/// controller named by the matched route.
///
/// One dispatcher serves one request: it owns the request context handed to
/// the controllers it builds.
pub struct Dispatcher {
    resolver: RouteResolver,
    registry: Arc<TypeRegistry>,
    settings: Arc<Settings>,
    run_mode: String,
    request: Arc<RequestContext>,
    session: Option<Arc<dyn SessionStore>>,
    di_file_pattern: Arc<str>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        routes: Arc<RouteTable>,
        registry: Arc<TypeRegistry>,
        settings: Arc<Settings>,
        run_mode: impl Into<String>,
    ) -> Self {
        Self {
            resolver: RouteResolver::new(routes),
            registry,
            settings,
            run_mode: run_mode.into(),
            request: Arc::new(RequestContext::default()),
            session: None,
            di_file_pattern: Arc::from(DEFAULT_DI_FILE_PATTERN),
        }
    }

    /// Dependency file pattern handed to controllers, usually
    /// `RuntimeConfig::di_file_pattern`.
    #[must_use]
    pub fn with_di_file_pattern(mut self, pattern: &str) -> Self {
        self.di_file_pattern = Arc::from(pattern);
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Arc::new(request);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    #[must_use]
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    #[must_use]
    pub fn run_mode(&self) -> &str {
        &self.run_mode
    }

    /// Route the request at `Settings::document_uri` and return the
    /// controller's response.
    pub fn handle(&self) -> Result<Response, RouteError> {
        let path = self.settings.document_uri();
        let matched = self.resolver.resolve(path)?;
        let route = &matched.route;
        ajax_guard(route, &self.request)?;

        let handler = route.controller().ok_or_else(|| RouteError::BadFormat {
            route: route.name().to_owned(),
            handler: String::new(),
        })?;

        self.dispatch(route.name(), handler, matched.params.clone())
    }

    /// Build the controller named by `handler` (`Type::method`) and call the
    /// method with `params`.
    pub fn dispatch(
        &self,
        route_name: &str,
        handler: &str,
        params: ParamVec,
    ) -> Result<Response, RouteError> {
        let mut parts = handler.split(HANDLER_SEPARATOR);
        let (Some(class), Some(method)) = (parts.next(), parts.next()) else {
            return Err(RouteError::BadFormat {
                route: route_name.to_owned(),
                handler: handler.to_owned(),
            });
        };

        let factory = match self.registry.get(class) {
            Some(TypeEntry::Controller(factory)) => factory,
            Some(TypeEntry::Service(_)) => {
                return Err(RouteError::BadInterface {
                    class: class.to_owned(),
                })
            }
            None => {
                return Err(RouteError::ClassNotFound {
                    class: class.to_owned(),
                })
            }
        };

        let mut controller = factory(ControllerInit {
            route_name: route_name.to_owned(),
            context: self.route_context(),
            run_mode: self.run_mode.clone(),
        });

        if !controller.has_method(method) {
            return Err(RouteError::MethodNotFound {
                class: class.to_owned(),
                method: method.to_owned(),
            });
        }

        controller.set_base_dir(self.settings.site_root().to_path_buf());

        debug!(
            route_name = %route_name,
            class = %class,
            method = %method,
            params = ?params,
            "Handler execution start"
        );
        let execution_start = Instant::now();

        let result = controller
            .before_call(method)
            .and_then(|()| controller.run(method, params));

        match result {
            Ok(response) => {
                info!(
                    route_name = %route_name,
                    handler = %handler,
                    status = response.status,
                    execution_time_us = execution_start.elapsed().as_micros(),
                    "Handler execution complete"
                );
                Ok(response)
            }
            Err(err) => {
                error!(
                    route_name = %route_name,
                    handler = %handler,
                    error = %err,
                    "Handler failed"
                );
                Err(RouteError::Handler(err))
            }
        }
    }

    fn route_context(&self) -> RouteContext {
        RouteContext::new(
            Arc::clone(self.resolver.table()),
            Arc::clone(&self.registry),
            Arc::clone(&self.settings),
            Arc::clone(&self.request),
            self.session.clone(),
        )
        .with_di_file_pattern(Arc::clone(&self.di_file_pattern))
    }
}

/// Routes flagged `ajax` only accept a POST carrying the XMLHttpRequest
/// marker header.
pub fn ajax_guard(route: &RouteSpec, request: &RequestContext) -> Result<(), RouteError> {
    if !route.ajax() || (request.is_post() && request.is_ajax()) {
        return Ok(());
    }

    warn!(
        route_name = %route.name(),
        method = %request.method(),
        "Ajax route rejected non-ajax request"
    );
    Err(RouteError::BadRequest {
        reason: format!("route \"{}\" accepts only ajax POST requests", route.name()),
    })
}
