//! Per-request site settings.
//!
//! The values here are produced by whatever accepts the connection (a FastCGI
//! bridge, an embedded HTTP server, a test) and are immutable for the life of
//! the container and resolver built from them.

use std::path::{Path, PathBuf};

/// Run mode used on developer machines.
pub const RUN_MODE_DEV: &str = "dev";

/// Run mode used in production.
pub const RUN_MODE_PROD: &str = "prod";

/// Site root, host and request URI for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    site_root: PathBuf,
    http_host: String,
    document_uri: String,
}

impl Settings {
    #[must_use]
    pub fn new(
        site_root: impl Into<PathBuf>,
        http_host: impl Into<String>,
        document_uri: impl Into<String>,
    ) -> Self {
        Self {
            site_root: site_root.into(),
            http_host: http_host.into(),
            document_uri: document_uri.into(),
        }
    }

    /// Root directory of the site; relative configuration paths hang off it.
    #[must_use]
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Value of the `Host` header.
    #[must_use]
    pub fn http_host(&self) -> &str {
        &self.http_host
    }

    /// Request path without the query string.
    #[must_use]
    pub fn document_uri(&self) -> &str {
        &self.document_uri
    }

    /// Resolve `path` against the site root unless it is already absolute.
    #[must_use]
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.site_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let settings = Settings::new("/srv/site", "example.org", "/");
        assert_eq!(
            settings.resolve_path("conf/di-dev.yaml"),
            PathBuf::from("/srv/site/conf/di-dev.yaml")
        );
    }

    #[test]
    fn test_resolve_absolute_path_is_kept() {
        let settings = Settings::new("/srv/site", "example.org", "/");
        assert_eq!(
            settings.resolve_path("/etc/routewire/di.yaml"),
            PathBuf::from("/etc/routewire/di.yaml")
        );
    }
}
