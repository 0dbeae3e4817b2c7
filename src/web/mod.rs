//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page dashboard frontend
//! - JSON API endpoints for the rendered page, navigation events, the model
//!   catalog and chart specs
//!
//! Launched via `metricdash serve` (default: `http://127.0.0.1:8501`).
//!
//! Requests are handled one at a time on the calling thread. Each browser
//! gets its own session state through a cookie; nothing is shared between
//! sessions, so no locking is involved.

mod api;
mod frontend;

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::assets;
use crate::catalog::ModelCatalog;
use crate::config::DashConfig;
use crate::error::DashError;
use crate::logging::{AccessLogEntry, Logger};
use crate::render::Chrome;
use crate::session::SessionStore;
use crate::session::store::{SESSION_COOKIE, session_id_from_cookie};
use crate::utils::process;

pub use api::BadRequest;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the request loop owns.
pub struct App {
    catalog: ModelCatalog,
    chrome: Chrome,
    sessions: SessionStore,
    logger: Logger,
}

/// A request reduced to the parts the router looks at.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    /// Raw `Cookie` header value.
    pub cookie: Option<&'a str>,
    pub body: Option<&'a str>,
}

/// A response before it is handed to `tiny_http`.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Session id to set as a cookie (new sessions only).
    pub new_session: Option<String>,
    /// Session the request was served for, for the access log.
    pub session: Option<String>,
    /// Navigation event applied, for the access log.
    pub event: Option<String>,
}

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";
const SVG: &str = "image/svg+xml";

impl Reply {
    fn new(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            new_session: None,
            session: None,
            event: None,
        }
    }

    pub(crate) fn json(status: u16, body: String) -> Self {
        Self::new(status, JSON, body.into_bytes())
    }

    pub(crate) fn html(body: String) -> Self {
        Self::new(200, HTML, body.into_bytes())
    }

    pub(crate) fn svg(body: String) -> Self {
        Self::new(200, SVG, body.into_bytes())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }

    /// `Set-Cookie` header value, if this reply starts a session.
    pub fn set_cookie(&self) -> Option<String> {
        self.new_session
            .as_ref()
            .map(|id| format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"))
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let cookie = self.set_cookie();
        let mut resp = Response::from_data(self.body).with_status_code(StatusCode(self.status));

        let mut headers = vec![
            ("Content-Type", self.content_type.to_string()),
            ("Cache-Control", "no-store".to_string()),
        ];
        if let Some(cookie) = cookie {
            headers.push(("Set-Cookie", cookie));
        }
        for (name, value) in headers {
            if let Ok(h) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                resp.add_header(h);
            }
        }
        resp
    }
}

impl App {
    /// Build the app from configuration.
    ///
    /// The decorative image, if configured, is read here in full. A missing
    /// or unreadable image fails with [`DashError::ResourceLoad`].
    pub fn from_config(config: &DashConfig) -> Result<Self> {
        let mut chrome = config.chrome();
        if let Some(path) = &config.appearance.sidebar_image {
            let image = assets::load_image(path)?;
            chrome.image = Some(image.data_uri());
        }

        Ok(Self::new(
            ModelCatalog::builtin(),
            chrome,
            SessionStore::new(
                config.session.idle_timeout_secs,
                config.session.max_sessions,
            ),
            Logger::from_config(&config.logging),
        ))
    }

    pub fn new(catalog: ModelCatalog, chrome: Chrome, sessions: SessionStore, logger: Logger) -> Self {
        Self {
            catalog,
            chrome,
            sessions,
            logger,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Route a request and turn any handler error into a JSON error reply.
    pub fn handle(&mut self, req: &ApiRequest<'_>) -> Reply {
        match self.dispatch(req) {
            Ok(reply) => reply,
            Err(e) => {
                let status = status_for(&e);
                if status >= 500 {
                    self.logger.error(&format!("{} {}: {e:#}", req.method, req.url));
                } else {
                    self.logger.debug(&format!("{} {}: {e:#}", req.method, req.url));
                }
                let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
                Reply::json(status, body)
            }
        }
    }

    /// Dispatch an incoming request to the appropriate handler.
    fn dispatch(&mut self, req: &ApiRequest<'_>) -> Result<Reply> {
        // Strip query string for path matching
        let path = req.url.split('?').next().unwrap_or(req.url);
        let body = req.body.unwrap_or("{}");

        match (req.method, path) {
            // Frontend
            (&Method::Get, "/") | (&Method::Get, "/index.html") => {
                Ok(Reply::html(frontend::INDEX_HTML.to_string()))
            }

            // API — session views
            (&Method::Get, "/api/page") => api::get_page(self, req.cookie),
            (&Method::Post, "/api/view") => api::post_view(self, req.cookie, body),
            (&Method::Post, "/api/model") => api::post_model(self, req.cookie, body),
            (&Method::Post, "/api/comparison") => api::post_comparison(self, req.cookie, body),
            (&Method::Post, "/api/event") => api::post_event(self, req.cookie, body),

            // API — catalog and charts
            (&Method::Get, "/api/catalog") => api::get_catalog(self),
            (&Method::Get, "/api/best") => api::get_best(self),
            (&Method::Get, "/api/chart") => api::get_chart(self, req.url),

            // API — health
            (&Method::Get, "/api/health") => api::get_health(self),

            // 404
            _ => Ok(not_found()),
        }
    }
}

/// Map an error to an HTTP status: domain and request errors are client
/// errors, everything else is a server error.
fn status_for(err: &anyhow::Error) -> u16 {
    for cause in err.chain() {
        if let Some(dash) = cause.downcast_ref::<DashError>() {
            return dash.status_code();
        }
        if cause.downcast_ref::<BadRequest>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
        {
            return 400;
        }
    }
    500
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server.
///
/// Blocks the current thread. Handles requests sequentially. Errors are
/// handled per request without stopping the server.
pub fn serve(config: &DashConfig) -> Result<()> {
    let mut app = App::from_config(config).context("failed to initialize dashboard")?;
    let addr = config.server.addr.as_str();

    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let url = format!("http://{addr}");
    app.logger.info(&format!("metricdash dashboard running at {url}"));
    app.logger.info("Press Ctrl+C to stop.");
    if let Some(path) = app.logger.access_log_path() {
        app.logger.debug(&format!("access log: {}", path.display()));
    }

    if config.server.open_browser && process::open_url(&url).is_err() {
        app.logger.warn("could not open a browser; visit the URL above");
    }

    for mut request in server.incoming_requests() {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();
        let cookie = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Cookie"))
            .map(|h| h.value.as_str().to_string());

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = app.handle(&ApiRequest {
            method: &method,
            url: &url,
            cookie: cookie.as_deref(),
            body: body.as_deref(),
        });

        let path = url.split('?').next().unwrap_or(&url);
        let mut entry = AccessLogEntry::new(
            method.as_str(),
            path,
            reply.status,
            started.elapsed().as_millis() as u64,
        )
        .with_event(reply.event.clone());
        if let Some(session) = &reply.session {
            entry = entry.with_session(session);
        }

        let _ = request.respond(reply.into_response());
        app.logger.record(&entry);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// 404 response.
fn not_found() -> Reply {
    Reply::json(404, r#"{"error": "not found"}"#.to_string())
}

/// Session id from a raw `Cookie` header.
pub(crate) fn cookie_session(cookie: Option<&str>) -> Option<&str> {
    cookie.and_then(session_id_from_cookie)
}
