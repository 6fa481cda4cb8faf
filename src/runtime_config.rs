//! # Runtime Configuration Module
//!
//! Process-level configuration loaded from environment variables.
//!
//! ## Environment Variables
//!
//! ### `ROUTEWIRE_RUN_MODE`
//!
//! Run mode passed to containers and controllers. Default: `dev`.
//!
//! ### `ROUTEWIRE_SITE_ROOT`
//!
//! Site root directory; relative configuration paths hang off it.
//! Default: the current directory.
//!
//! ### `ROUTEWIRE_ROUTE_FILE`
//!
//! Route file, relative to the site root. Default: `conf/route.yaml`.
//!
//! ### `ROUTEWIRE_DI_FILE_PATTERN`
//!
//! Dependency file pattern; `{mode}` is replaced by the run mode.
//! Default: `conf/di-{mode}.yaml`.
//!
//! ## Usage
//!
//! ```rust
//! use routewire::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("routes: {}", config.route_path().display());
//! ```

use crate::settings::{Settings, RUN_MODE_DEV};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ROUTE_FILE: &str = "conf/route.yaml";
pub const DEFAULT_DI_FILE_PATTERN: &str = "conf/di-{mode}.yaml";

/// Placeholder replaced by the run mode in a dependency file pattern.
pub const MODE_PLACEHOLDER: &str = "{mode}";

/// Dependency file for `run_mode`, relative to the site root.
#[must_use]
pub fn di_file_for(pattern: &str, run_mode: &str) -> PathBuf {
    PathBuf::from(pattern.replace(MODE_PLACEHOLDER, run_mode))
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub run_mode: String,
    pub site_root: PathBuf,
    pub route_file: PathBuf,
    /// Dependency file pattern containing `{mode}`
    pub di_file_pattern: String,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        RuntimeConfig {
            run_mode: non_empty("ROUTEWIRE_RUN_MODE").unwrap_or_else(|| RUN_MODE_DEV.to_string()),
            site_root: non_empty("ROUTEWIRE_SITE_ROOT")
                .map(PathBuf::from)
                .or_else(|| env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from(".")),
            route_file: non_empty("ROUTEWIRE_ROUTE_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_ROUTE_FILE), PathBuf::from),
            di_file_pattern: non_empty("ROUTEWIRE_DI_FILE_PATTERN")
                .unwrap_or_else(|| DEFAULT_DI_FILE_PATTERN.to_string()),
        }
    }

    /// Route file resolved against the site root.
    #[must_use]
    pub fn route_path(&self) -> PathBuf {
        self.site_root.join(&self.route_file)
    }

    /// Dependency file for the configured run mode, relative to the site
    /// root.
    #[must_use]
    pub fn di_file(&self) -> PathBuf {
        di_file_for(&self.di_file_pattern, &self.run_mode)
    }

    /// [`Self::di_file`] resolved against the site root.
    #[must_use]
    pub fn di_path(&self) -> PathBuf {
        self.site_root.join(self.di_file())
    }

    /// Settings for one request on this site.
    #[must_use]
    pub fn settings(&self, http_host: &str, document_uri: &str) -> Settings {
        Settings::new(self.site_root.clone(), http_host, document_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config.run_mode, "dev");
        assert_eq!(config.route_file, PathBuf::from("conf/route.yaml"));
        assert_eq!(config.di_file_pattern, "conf/di-{mode}.yaml");
    }

    #[test]
    fn test_overrides_and_paths() {
        let config = RuntimeConfig::from_lookup(|key| match key {
            "ROUTEWIRE_RUN_MODE" => Some("prod".to_string()),
            "ROUTEWIRE_SITE_ROOT" => Some("/srv/site".to_string()),
            "ROUTEWIRE_ROUTE_FILE" => Some("etc/routes.json".to_string()),
            "ROUTEWIRE_DI_FILE_PATTERN" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.run_mode, "prod");
        assert_eq!(config.route_path(), PathBuf::from("/srv/site/etc/routes.json"));
        assert_eq!(config.di_path(), PathBuf::from("/srv/site/conf/di-prod.yaml"));

        let custom = RuntimeConfig {
            di_file_pattern: "etc/{mode}/services.json".to_string(),
            ..config.clone()
        };
        assert_eq!(custom.di_file(), PathBuf::from("etc/prod/services.json"));

        let settings = config.settings("example.org", "/user/1");
        assert_eq!(settings.site_root(), std::path::Path::new("/srv/site"));
        assert_eq!(settings.document_uri(), "/user/1");
    }
}
