use crate::di::ConfigDocument;
use crate::dispatcher::ajax_guard;
use crate::request::{RequestContext, HEADER_REQUESTED_WITH};
use crate::router::{RouteResolver, RouteTable};
use crate::runtime_config::RuntimeConfig;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line interface for routewire
///
/// Inspects route and dependency files without running a server.
#[derive(Parser, Debug)]
#[command(name = "routewire")]
#[command(about = "Inspect routewire route and dependency files", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a request path against the route file
    Match {
        /// Route file (default: $ROUTEWIRE_ROUTE_FILE under the site root)
        #[arg(short, long)]
        routes: Option<PathBuf>,

        /// Request path, e.g. /user/42
        path: String,

        /// HTTP method of the simulated request
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Send the XMLHttpRequest marker header
        #[arg(long, default_value_t = false)]
        ajax: bool,
    },
    /// Build the URL path of a named route
    Path {
        /// Route file (default: $ROUTEWIRE_ROUTE_FILE under the site root)
        #[arg(short, long)]
        routes: Option<PathBuf>,

        /// Route name
        name: String,

        /// Placeholder value as key=value (repeatable)
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,

        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// List the class and raw names of a dependency file after include merging
    InspectDi {
        /// Dependency file (default: $ROUTEWIRE_DI_FILE_PATTERN for the run mode)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Site root relative paths are resolved against
        #[arg(long, env = "ROUTEWIRE_SITE_ROOT")]
        site_root: Option<PathBuf>,
    },
}

/// Parse and execute the command line, printing to stdout.
///
/// # Errors
///
/// Returns an error if a configuration file cannot be loaded or the
/// requested route cannot be matched or built.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &RuntimeConfig::from_env(), &mut stdout.lock())
}

/// Execute `cli` against `config`, writing the report to `out`.
pub fn execute(cli: &Cli, config: &RuntimeConfig, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Match {
            routes,
            path,
            method,
            ajax,
        } => {
            let table = load_routes(routes.as_ref(), config)?;
            let resolver = RouteResolver::new(Arc::new(table));
            let method: Method = method
                .to_uppercase()
                .parse()
                .with_context(|| format!("Invalid HTTP method: {method}"))?;
            let mut request = RequestContext::new(method);
            if *ajax {
                request = request.with_header(HEADER_REQUESTED_WITH, "XMLHttpRequest");
            }

            let outcome = resolver
                .resolve(path)
                .and_then(|matched| ajax_guard(&matched.route, &request).map(|()| matched));
            match outcome {
                Ok(matched) => {
                    writeln!(out, "route:   {}", matched.route_name())?;
                    writeln!(
                        out,
                        "handler: {}",
                        matched.route.controller().unwrap_or("<none>")
                    )?;
                    writeln!(out, "params:  {:?}", matched.params.as_slice())?;
                }
                Err(err) => {
                    writeln!(out, "error:   {err}")?;
                    writeln!(out, "status:  {}", err.status_code().as_u16())?;
                }
            }
            Ok(())
        }
        Commands::Path {
            routes,
            name,
            vars,
            query,
        } => {
            let table = load_routes(routes.as_ref(), config)?;
            let vars: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let query: Vec<(&str, &str)> =
                query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let path = table.path_for(name, &vars, &query)?;
            writeln!(out, "{path}")?;
            Ok(())
        }
        Commands::InspectDi { file, site_root } => {
            let site_root = site_root.as_ref().unwrap_or(&config.site_root);
            let path = site_root.join(file.clone().unwrap_or_else(|| config.di_file()));
            let document = ConfigDocument::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;

            writeln!(out, "file: {}", path.display())?;
            if let Some(include) = document.include() {
                writeln!(out, "include: {include}")?;
            }
            writeln!(out, "class:")?;
            for name in document.class_names() {
                let class = document
                    .class_entry(name)
                    .and_then(|entry| entry.get("class"))
                    .and_then(|class| class.as_str())
                    .unwrap_or("<missing>");
                writeln!(out, "  {name}: {class}")?;
            }
            writeln!(out, "raw:")?;
            for name in document.raw_names() {
                writeln!(out, "  {name}")?;
            }
            Ok(())
        }
    }
}

fn load_routes(routes: Option<&PathBuf>, config: &RuntimeConfig) -> Result<RouteTable> {
    let path = routes.map_or_else(|| config.route_path(), |p| config.site_root.join(p));
    RouteTable::load(&path).with_context(|| format!("Failed to load routes from {}", path.display()))
}

fn parse_key_value(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got \"{s}\""))?;
    Ok((key.to_string(), value.to_string()))
}
