//! Development server that rebuilds the site before serving pages.
//!
//! Built on `tiny_http`:
//!
//! - Static file serving from `_site`
//! - Automatic `index.html` resolution for directories
//! - A [`RequestHook`] run before every request; [`RebuildHook`] rebuilds
//!   the whole site when a page is requested
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! request ──► RequestHook::before_request(path)
//!                 │  .html or no extension → build_site()
//!                 │  (failure is logged, the request is still served)
//!                 ▼
//!             resolve path ──► file / dir/index.html / 404
//! ```
//!
//! Requests are handled one at a time on the calling thread, so two
//! triggered builds never overlap.

use crate::{
    build::build_site,
    config::{ServeConfig, SiteConfig, SitePaths, defaults::PAGE_EXTENSION},
    log,
};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Request Hooks
// ============================================================================

/// Runs before a request is served.
pub trait RequestHook {
    /// Called with the decoded request path, query stripped.
    fn before_request(&self, url_path: &str) -> Result<()>;
}

/// Rebuilds the site whenever a page is requested.
pub struct RebuildHook {
    root: PathBuf,
}

impl RebuildHook {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl RequestHook for RebuildHook {
    fn before_request(&self, url_path: &str) -> Result<()> {
        if !triggers_rebuild(url_path) {
            return Ok(());
        }
        let report = build_site(&self.root, false)?;
        log!("rebuild"; "{} ({} pages)", url_path, report.pages);
        Ok(())
    }
}

/// Page requests (`.html` or no extension) trigger a rebuild.
fn triggers_rebuild(url_path: &str) -> bool {
    Path::new(url_path)
        .extension()
        .is_none_or(|ext| ext == PAGE_EXTENSION)
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Build the site, then serve it until Ctrl+C.
///
/// `interface` and `port` override the `serve` section of the config. The
/// server only binds once the initial build has succeeded.
pub fn build_and_serve(root: &Path, interface: Option<&str>, port: Option<u16>) -> Result<()> {
    let serve = prepare(root, interface, port)?;
    serve_site(root, &serve, &RebuildHook::new(root))
}

/// Run the initial build and resolve the server settings.
fn prepare(root: &Path, interface: Option<&str>, port: Option<u16>) -> Result<ServeConfig> {
    build_site(root, true)?;

    let mut serve = SiteConfig::load(root)?.serve;
    if let Some(interface) = interface {
        serve.interface = interface.to_owned();
    }
    if let Some(port) = port {
        serve.port = port;
    }
    Ok(serve)
}

/// Serve the output root of the site at `root`.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Enters the request loop, running `hook` before each request
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site(root: &Path, serve: &ServeConfig, hook: &dyn RequestHook) -> Result<()> {
    let interface: IpAddr = serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", serve.interface))?;
    let serve_root = SitePaths::new(root).output;

    let (server, addr) = try_bind_port(interface, serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &serve_root, hook) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request.
///
/// Request resolution order:
/// 1. Exact file match → serve file
/// 2. Directory with index.html → serve index.html
/// 3. Nothing found → 404
fn handle_request(request: Request, serve_root: &Path, hook: &dyn RequestHook) -> Result<()> {
    let Some(url_path) = request_path(request.url()) else {
        return serve_not_found(request);
    };

    if let Err(e) = hook.before_request(&url_path) {
        log!("error"; "rebuild failed: {:#}", e);
    }

    match resolve_file(serve_root, &url_path) {
        Some(path) => serve_file(request, &path),
        None => serve_not_found(request),
    }
}

/// Strip the query, then decode URL-encoded characters (e.g., %20 → space).
///
/// `None` if the path does not decode to UTF-8.
fn request_path(url: &str) -> Option<String> {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    urlencoding::decode(path)
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// Map a request path to a file below the serve root.
fn resolve_file(serve_root: &Path, url_path: &str) -> Option<PathBuf> {
    let request_path = url_path.trim_matches('/');
    if Path::new(request_path)
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        return None;
    }

    let local_path = serve_root.join(request_path);
    if local_path.is_file() {
        return Some(local_path);
    }

    let index_path = local_path.join("index.html");
    index_path.is_file().then_some(index_path)
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response =
        Response::from_data(content).with_header(content_type_header(guess_content_type(path))?);

    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![content_type_header("text/plain")?],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn content_type_header(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("Invalid header value `{value}`"))
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}
