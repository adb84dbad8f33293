use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{ShowcaseError, ShowcaseResult};

pub const BASE_PATH_VAR: &str = "BASE_PATH";
pub const HOST_VAR: &str = "SHOWCASE_HOST";
pub const PORT_VAR: &str = "PORT";
pub const PROJECTS_DIR_VAR: &str = "PROJECTS_DIR";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// Mount point of the site; `/` or `/name` without a trailing slash.
    pub base_path: String,
    pub host: String,
    pub port: u16,
    pub projects_dir: PathBuf,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
        }
    }
}

impl ShowcaseConfig {
    pub fn from_env() -> ShowcaseResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ShowcaseResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match read(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ShowcaseError::InvalidConfig(format!("{PORT_VAR} must be a port number, got {raw:?}"))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            base_path: read(BASE_PATH_VAR)
                .map(|raw| normalize_base_path(&raw))
                .unwrap_or(defaults.base_path),
            host: read(HOST_VAR)
                .map(|raw| raw.trim().to_string())
                .unwrap_or(defaults.host),
            port,
            projects_dir: read(PROJECTS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.projects_dir),
        })
    }

    pub fn bind_addr(&self) -> ShowcaseResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ShowcaseError::InvalidConfig(format!(
                    "cannot bind {}:{}; {HOST_VAR} must be an IP address",
                    self.host, self.port
                ))
            })
    }

    /// Site-absolute link for a path relative to the base.
    pub fn href(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        match (self.base_path.as_str(), path.is_empty()) {
            ("/", _) => format!("/{path}"),
            (base, true) => format!("{base}/"),
            (base, false) => format!("{base}/{path}"),
        }
    }

    /// Route pattern for a fixed endpoint under the base path.
    pub fn route(&self, path: &str) -> String {
        if self.base_path == "/" {
            path.to_string()
        } else {
            format!("{}{path}", self.base_path)
        }
    }

    /// Request path relative to the base, or `None` when outside it.
    pub fn strip_base<'a>(&self, request_path: &'a str) -> Option<&'a str> {
        if self.base_path == "/" {
            return Some(request_path);
        }
        let rest = request_path.strip_prefix(self.base_path.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

/// Strips the trailing slash, ensures a leading one, and maps empty to `/`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ShowcaseConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, ShowcaseConfig::default());
        assert_eq!(config.port, 5173);
    }

    #[test]
    fn reads_all_values() {
        let config = ShowcaseConfig::from_lookup(lookup(&[
            ("BASE_PATH", "/demo/"),
            ("SHOWCASE_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PROJECTS_DIR", "/srv/projects"),
        ]))
        .expect("config");
        assert_eq!(config.base_path, "/demo");
        assert_eq!(config.bind_addr().expect("addr").port(), 8080);
        assert_eq!(config.projects_dir, PathBuf::from("/srv/projects"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let error = ShowcaseConfig::from_lookup(lookup(&[("PORT", "eighty")]))
            .expect_err("bad port");
        assert!(matches!(error, ShowcaseError::InvalidConfig(_)));
    }

    #[test]
    fn base_path_normalisation() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("demo"), "/demo");
        assert_eq!(normalize_base_path("/a/b/"), "/a/b");
    }

    #[test]
    fn links_and_routes_respect_base() {
        let root = ShowcaseConfig::default();
        assert_eq!(root.href(""), "/");
        assert_eq!(root.href("reports/q1"), "/reports/q1");
        assert_eq!(root.route("/health"), "/health");

        let nested = ShowcaseConfig {
            base_path: "/demo".to_string(),
            ..ShowcaseConfig::default()
        };
        assert_eq!(nested.href(""), "/demo/");
        assert_eq!(nested.href("/todo/"), "/demo/todo");
        assert_eq!(nested.route("/health"), "/demo/health");
        assert_eq!(nested.strip_base("/demo"), Some(""));
        assert_eq!(nested.strip_base("/demo/todo"), Some("/todo"));
        assert_eq!(nested.strip_base("/demolition"), None);
        assert_eq!(nested.strip_base("/other"), None);
    }
}
