//! Configuration structs built once at startup from CLI flags and env vars.
//!
//! Every subcommand constructs its config explicitly in `main` and passes it
//! down by parameter; nothing reads process-wide state ad hoc after startup.

use crate::highlight::DEFAULT_KEYWORDS;
use crate::html::base64_encode;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Fatal configuration errors, reported synchronously at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Basic Auth credentials are not configured; set BASIC_AUTH_USER and \
         BASIC_AUTH_PASS, or pass --no-auth to serve without authentication"
    )]
    MissingCredentials,

    #[error("public directory {path} is not usable: {source}")]
    PublicDir {
        path: String,
        source: std::io::Error,
    },
}

/// Shared settings for the build subcommands (render, archive-index, home).
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Root directory for build outputs and served files.
    pub public_dir: PathBuf,
    /// Directory containing the HTML template files.
    pub templates_dir: PathBuf,
    /// Cue keywords for highlighting and dashboard focus selection.
    pub keywords: Vec<String>,
}

impl SiteConfig {
    pub fn new(public_dir: &str, templates_dir: Option<&str>, keywords: Option<&str>) -> Self {
        let public_dir = PathBuf::from(public_dir);
        let templates_dir = templates_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| public_dir.join("templates"));
        Self {
            public_dir,
            templates_dir,
            keywords: parse_keywords(keywords),
        }
    }

    /// Resolve a CLI-supplied path: absolute paths pass through, relative
    /// paths land under the public root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.public_dir.join(p)
        }
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(name)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.public_dir.join("archive")
    }
}

/// Precomputed Basic Auth expectation.
///
/// The expected `Authorization` header value is computed once at startup;
/// per-request checking is a string comparison.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    expected: String,
}

impl BasicAuth {
    pub fn new(user: &str, pass: &str) -> Self {
        let token = base64_encode(format!("{user}:{pass}").as_bytes());
        Self {
            expected: format!("Basic {token}"),
        }
    }

    /// Check a raw `Authorization` header value against the configured
    /// credentials.
    pub fn matches(&self, header: Option<&str>) -> bool {
        header == Some(self.expected.as_str())
    }
}

/// Static file server settings. Read once at process start, immutable after.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Canonicalized root of the served directory tree.
    pub public_dir: PathBuf,
    /// `None` only when authentication was explicitly disabled.
    pub auth: Option<BasicAuth>,
    /// File extensions answered with 404 even when the file exists.
    pub hidden_extensions: Vec<String>,
}

impl ServerConfig {
    /// Build the server configuration, failing closed: unless `no_auth` is
    /// set, both credentials must be present or the server refuses to start.
    pub fn new(
        port: u16,
        public_dir: &str,
        user: Option<String>,
        pass: Option<String>,
        no_auth: bool,
    ) -> Result<Self, ConfigError> {
        let public_dir = Path::new(public_dir)
            .canonicalize()
            .map_err(|source| ConfigError::PublicDir {
                path: public_dir.to_string(),
                source,
            })?;

        let auth = if no_auth {
            warn!("Basic Auth is DISABLED; serving without authentication");
            None
        } else {
            match (user, pass) {
                (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => {
                    Some(BasicAuth::new(&u, &p))
                }
                _ => return Err(ConfigError::MissingCredentials),
            }
        };

        Ok(Self {
            port,
            public_dir,
            auth,
            hidden_extensions: vec!["md".to_string()],
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Page text fetcher settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: String,
    /// Browser executable override; `None` lets the launcher auto-detect.
    pub browser_path: Option<PathBuf>,
    /// Timeout applied to the navigation step specifically.
    pub timeout: Duration,
}

fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    }
}
