//! Static file server with HTTP Basic Auth.
//!
//! Serves the public directory read-only. Request handling is a short
//! sequential chain with early returns per failure branch: auth check,
//! percent-decoding, path safety, stat, read, respond. The server holds no
//! cache and re-reads from disk on every request, so concurrent requests
//! only ever share the immutable [`ServerConfig`].

use crate::config::ServerConfig;
use crate::html::escape_html;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use itertools::Itertools;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

const REALM: &str = r#"Basic realm="news-briefing""#;

/// Bind and serve until the process is stopped.
#[instrument(level = "info", skip_all, fields(port = config.port))]
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let addr = config.addr();
    let app = router(Arc::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving public directory");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Every path goes through the same handler; there are no routes.
pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new().fallback(handle).with_state(config)
}

async fn handle(
    State(config): State<Arc<ServerConfig>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    serve_request(&config, uri.path(), authorization).await
}

/// Answer a single request. Every failure branch returns early with a
/// constant body; internal paths never reach the response.
async fn serve_request(
    config: &ServerConfig,
    raw_path: &str,
    authorization: Option<&str>,
) -> Response {
    if let Some(auth) = &config.auth {
        if !auth.matches(authorization) {
            debug!(path = raw_path, "Rejecting unauthenticated request");
            return challenge();
        }
    }

    let decoded = match urlencoding::decode(raw_path) {
        Ok(p) => p.into_owned(),
        Err(_) => return plain(StatusCode::BAD_REQUEST, "Bad request"),
    };

    // Root maps to the dashboard.
    let rel = if decoded == "/" {
        "index.html".to_string()
    } else {
        decoded.trim_start_matches('/').to_string()
    };

    // Pre-render sources are configured invisible even though they exist.
    let lower = rel.to_lowercase();
    if config
        .hidden_extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
    {
        return plain(StatusCode::NOT_FOUND, "Not found");
    }

    let Some(path) = resolve_path(&config.public_dir, &rel) else {
        warn!(path = raw_path, "Rejected path escaping the public root");
        return plain(StatusCode::BAD_REQUEST, "Bad request");
    };

    let meta = match fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(e) => return fs_error(&e),
    };

    // The path exists; verify its canonical form stays under the root.
    match path.canonicalize() {
        Ok(real) if real.starts_with(&config.public_dir) => {}
        Ok(_) => {
            warn!(path = raw_path, "Rejected path resolving outside the public root");
            return plain(StatusCode::BAD_REQUEST, "Bad request");
        }
        Err(e) => return fs_error(&e),
    }

    if meta.is_dir() {
        serve_dir(raw_path, &path).await
    } else {
        serve_file(&path).await
    }
}

/// Map a decoded request path to a filesystem path under `root`.
///
/// Backslashes are treated as separators, `.` components are dropped, and
/// any parent/root/prefix component rejects the whole path.
fn resolve_path(root: &Path, rel: &str) -> Option<PathBuf> {
    let cleaned = rel.replace('\\', "/");
    let mut path = root.to_path_buf();
    for component in Path::new(&cleaned).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

async fn serve_file(path: &Path) -> Response {
    match fs::read(path).await {
        Ok(body) => ok(content_type(path), body),
        Err(e) => fs_error(&e),
    }
}

/// Directory requests serve `index.html` when present, else a generated
/// listing.
async fn serve_dir(raw_path: &str, dir: &Path) -> Response {
    match fs::read(dir.join("index.html")).await {
        Ok(body) => return ok("text/html; charset=utf-8", body),
        Err(e) if e.kind() != ErrorKind::NotFound => return fs_error(&e),
        Err(_) => {}
    }

    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(_) => return plain(StatusCode::FORBIDDEN, "Forbidden"),
    };

    let mut entries: Vec<(String, bool)> = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name == ".DS_Store" {
            continue;
        }
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push((name, is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let base = if raw_path.ends_with('/') {
        raw_path.to_string()
    } else {
        format!("{raw_path}/")
    };
    ok("text/html; charset=utf-8", listing_html(&base, &entries).into_bytes())
}

fn listing_html(base: &str, entries: &[(String, bool)]) -> String {
    let base_esc = escape_html(base);
    let items = entries
        .iter()
        .map(|(name, is_dir)| {
            let slash = if *is_dir { "/" } else { "" };
            format!(
                r#"<li><a href="{base_esc}{}{slash}">{}{slash}</a></li>"#,
                urlencoding::encode(name),
                escape_html(name)
            )
        })
        .join("\n");
    format!(
        r#"<!doctype html><meta charset="utf-8"><title>Index of {base_esc}</title><h1>Index of {base_esc}</h1><ul><li><a href="../">../</a></li>{items}</ul>"#
    )
}

/// Content type by file extension; unknown extensions are served as binary.
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn ok(content_type: &'static str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            // Pages are rebuilt in place; clients must always revalidate.
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM)],
        "Authentication required.",
    )
        .into_response()
}

fn fs_error(e: &std::io::Error) -> Response {
    match e.kind() {
        ErrorKind::NotFound => plain(StatusCode::NOT_FOUND, "Not found"),
        ErrorKind::PermissionDenied => plain(StatusCode::FORBIDDEN, "Forbidden"),
        _ => plain(StatusCode::INTERNAL_SERVER_ERROR, "Error"),
    }
}
