use crate::di::{DependencyContainer, DiError};
use crate::registry::TypeRegistry;
use crate::request::RequestContext;
use crate::response::{Response, HTTP_CODE_NOT_FOUND};
use crate::router::{RouteError, RouteTable};
use crate::runtime_config::{di_file_for, DEFAULT_DI_FILE_PATTERN};
use crate::session::SessionStore;
use crate::settings::Settings;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Shared routing state handed to every controller built by a dispatcher.
#[derive(Clone)]
pub struct RouteContext {
    routes: Arc<RouteTable>,
    registry: Arc<TypeRegistry>,
    settings: Arc<Settings>,
    request: Arc<RequestContext>,
    session: Option<Arc<dyn SessionStore>>,
    di_file_pattern: Arc<str>,
}

impl RouteContext {
    #[must_use]
    pub fn new(
        routes: Arc<RouteTable>,
        registry: Arc<TypeRegistry>,
        settings: Arc<Settings>,
        request: Arc<RequestContext>,
        session: Option<Arc<dyn SessionStore>>,
    ) -> Self {
        Self {
            routes,
            registry,
            settings,
            request,
            session,
            di_file_pattern: Arc::from(DEFAULT_DI_FILE_PATTERN),
        }
    }

    /// Where controllers load their dependency document from; `{mode}` is
    /// replaced by the run mode.
    #[must_use]
    pub fn with_di_file_pattern(mut self, pattern: Arc<str>) -> Self {
        self.di_file_pattern = pattern;
        self
    }

    #[must_use]
    pub fn di_file_pattern(&self) -> &str {
        &self.di_file_pattern
    }

    #[must_use]
    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    #[must_use]
    pub fn request(&self) -> &Arc<RequestContext> {
        &self.request
    }

    #[must_use]
    pub fn session(&self) -> Option<&Arc<dyn SessionStore>> {
        self.session.as_ref()
    }
}

impl fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("settings", &self.settings)
            .field("request", &self.request)
            .field("di_file_pattern", &self.di_file_pattern)
            .field("has_session", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything a controller factory receives for one dispatch.
#[derive(Debug, Clone)]
pub struct ControllerInit {
    /// Name of the matched route
    pub route_name: String,
    pub context: RouteContext,
    pub run_mode: String,
}

/// Common controller state: route name, run mode, directories, a lazily
/// built dependency container and URL helpers.
///
/// Concrete controllers embed one and delegate
/// [`Controller::set_base_dir`](super::Controller::set_base_dir) to it.
///
/// ```rust,ignore
/// struct UserController {
///     ctx: ControllerContext,
/// }
///
/// impl Controller for UserController {
///     fn has_method(&self, method: &str) -> bool {
///         method == "show"
///     }
///
///     fn set_base_dir(&mut self, dir: PathBuf) {
///         self.ctx.set_base_dir(dir);
///     }
///
///     fn run(&mut self, _method: &str, params: ParamVec) -> anyhow::Result<Response> {
///         let repo = self.ctx.di()?.get::<UserRepo>("users")?;
///         Ok(Response::json(repo.find(&params[0])?))
///     }
/// }
/// ```
pub struct ControllerContext {
    route_name: String,
    run_mode: String,
    context: RouteContext,
    base_dir: PathBuf,
    di: Option<DependencyContainer>,
}

impl ControllerContext {
    #[must_use]
    pub fn new(init: ControllerInit) -> Self {
        Self {
            route_name: init.route_name,
            run_mode: init.run_mode,
            context: init.context,
            base_dir: PathBuf::new(),
            di: None,
        }
    }

    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    #[must_use]
    pub fn run_mode(&self) -> &str {
        &self.run_mode
    }

    #[must_use]
    pub fn context(&self) -> &RouteContext {
        &self.context
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.context.settings
    }

    #[must_use]
    pub fn request(&self) -> &RequestContext {
        &self.context.request
    }

    #[must_use]
    pub fn session(&self) -> Option<&Arc<dyn SessionStore>> {
        self.context.session()
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = dir.into();
    }

    #[must_use]
    pub fn conf_dir(&self) -> PathBuf {
        self.base_dir.join("conf")
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Template directory.
    #[must_use]
    pub fn tpl_dir(&self) -> PathBuf {
        self.base_dir.join("tpl")
    }

    /// Per-host cache directory under the system temp dir.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        std::env::temp_dir()
            .join("cache")
            .join(self.context.settings.http_host())
    }

    /// The controller's dependency container, loaded on first use from the
    /// route context's dependency file pattern (`conf/di-<run mode>.yaml`
    /// unless configured otherwise).
    pub fn di(&mut self) -> Result<&mut DependencyContainer, DiError> {
        let di = match self.di.take() {
            Some(di) => di,
            None => {
                let path = di_file_for(&self.context.di_file_pattern, &self.run_mode);
                debug!(
                    route_name = %self.route_name,
                    path = %path.display(),
                    "Loading controller dependencies"
                );
                DependencyContainer::new(
                    path,
                    Arc::clone(&self.context.settings),
                    self.run_mode.clone(),
                    Arc::clone(&self.context.registry),
                )?
            }
        };
        Ok(self.di.insert(di))
    }

    /// URL path of route `name`, see [`RouteTable::path_for`].
    pub fn route_path(
        &self,
        name: &str,
        vars: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<String, RouteError> {
        self.context.routes.path_for(name, vars, query)
    }

    /// `<scheme>://<host><path>` for route `name`.
    pub fn absolute_url(
        &self,
        name: &str,
        vars: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<String, RouteError> {
        let path = self.route_path(name, vars, query)?;
        Ok(self
            .context
            .request
            .absolute_url(self.context.settings.http_host(), &path))
    }

    #[must_use]
    pub fn redirect_to_url(&self, url: &str, status: u16) -> Response {
        Response::redirect(url, status)
    }

    pub fn redirect_to_route(
        &self,
        name: &str,
        vars: &[(&str, &str)],
        status: u16,
    ) -> Result<Response, RouteError> {
        let path = self.route_path(name, vars, &[])?;
        Ok(Response::redirect(&path, status))
    }

    /// Empty 4xx response; codes outside 400..=499 become 404.
    #[must_use]
    pub fn error_4xx(&self, status: u16) -> Response {
        if (400..500).contains(&status) {
            Response::error(status)
        } else {
            Response::error(HTTP_CODE_NOT_FOUND)
        }
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("route_name", &self.route_name)
            .field("run_mode", &self.run_mode)
            .field("base_dir", &self.base_dir)
            .field("di_loaded", &self.di.is_some())
            .finish_non_exhaustive()
    }
}
