//! JSON API handlers for the web dashboard.
//!
//! Session handlers resolve the caller's [`SessionState`](crate::session::SessionState)
//! from the cookie, apply at most one navigation event, and respond with the
//! freshly rendered page. Catalog and chart handlers are stateless.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Metric, ModelCatalog, ModelRecord};
use crate::chart::{self, ChartSpec, svg};
use crate::error::DashError;
use crate::render::{self, Chrome, Page, html};
use crate::session::{NavEvent, NavOutcome, SessionState, View};

use super::{App, Reply, cookie_session};

/// A malformed request that is not a domain error (missing parameters).
#[derive(Debug, Error)]
#[error("bad request: {0}")]
pub struct BadRequest(pub String);

// ---------------------------------------------------------------------------
// JSON request/response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PageResponse {
    page: Page,
    /// Pre-rendered sidebar navigation.
    nav_html: String,
    /// Pre-rendered main panel.
    body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<NavOutcome>,
}

#[derive(Deserialize)]
struct ViewRequest {
    view: String,
}

#[derive(Deserialize)]
struct ModelRequest {
    model: String,
}

#[derive(Deserialize)]
struct ComparisonRequest {
    models: Vec<String>,
}

#[derive(Serialize)]
struct CatalogResponse<'a> {
    metrics: Vec<&'static str>,
    models: Vec<&'a ModelRecord>,
}

#[derive(Serialize)]
struct BestResponse<'a> {
    model: &'a ModelRecord,
    cards: Vec<render::MetricCard>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    models: usize,
    sessions: usize,
    sidebar_image: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Reply::json(200, body))
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T> {
    serde_json::from_str(body).context("invalid JSON in request body")
}

/// Short description of an event for the access log.
fn describe(event: &NavEvent) -> String {
    match event {
        NavEvent::SetView { view } => format!("view={view}"),
        NavEvent::SelectModel { model } => format!("model={model}"),
        NavEvent::SetComparison { models } => format!("compare={}", models.join(",")),
    }
}

/// Resolve the session, apply `event`, and render the resulting page.
fn page_reply(app: &mut App, cookie: Option<&str>, event: Option<NavEvent>) -> Result<Reply> {
    let checkout = app.sessions.checkout(&app.catalog, cookie_session(cookie));
    let (id, created) = (checkout.id, checkout.created);

    let rendered = apply_and_render(&app.catalog, &app.chrome, checkout.state, event.as_ref());
    let (outcome, page) = match rendered {
        Ok(done) => done,
        Err(e) => {
            // Error replies carry no cookie, so a fresh session is unreachable.
            if created {
                app.sessions.remove(&id);
            }
            return Err(e.into());
        }
    };

    let resp = PageResponse {
        nav_html: html::nav_html(&page.nav),
        body_html: html::body_html(&page),
        page,
        outcome,
    };

    let mut reply = json_response(&resp)?;
    let id = id.to_string();
    if created {
        reply.new_session = Some(id.clone());
    }
    reply.session = Some(id);
    reply.event = event.as_ref().map(describe);
    Ok(reply)
}

/// Apply `event` (if any) to `state` and render the result.
fn apply_and_render(
    catalog: &ModelCatalog,
    chrome: &Chrome,
    state: &mut SessionState,
    event: Option<&NavEvent>,
) -> Result<(Option<NavOutcome>, Page), DashError> {
    let outcome = event.map(|e| state.apply(catalog, e)).transpose()?;
    let page = render::render_page(catalog, state, chrome)?;
    Ok((outcome, page))
}

/// Query parameters of a URL, percent-decoded.
fn query_pairs(url: &str) -> Vec<(String, String)> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

/// `GET /api/page` — the caller's active view.
pub fn get_page(app: &mut App, cookie: Option<&str>) -> Result<Reply> {
    page_reply(app, cookie, None)
}

/// `POST /api/view` — `{"view": "DASHBOARD" | "MODELS"}`.
pub fn post_view(app: &mut App, cookie: Option<&str>, body: &str) -> Result<Reply> {
    let req: ViewRequest = parse_body(body)?;
    let view: View = req.view.parse()?;
    page_reply(app, cookie, Some(NavEvent::SetView { view }))
}

/// `POST /api/model` — `{"model": "SVM"}`.
pub fn post_model(app: &mut App, cookie: Option<&str>, body: &str) -> Result<Reply> {
    let req: ModelRequest = parse_body(body)?;
    page_reply(app, cookie, Some(NavEvent::SelectModel { model: req.model }))
}

/// `POST /api/comparison` — `{"models": ["SVM", "Naive Bayes"]}`.
///
/// Unknown names are dropped and listed in `outcome.dropped`.
pub fn post_comparison(app: &mut App, cookie: Option<&str>, body: &str) -> Result<Reply> {
    let req: ComparisonRequest = parse_body(body)?;
    page_reply(
        app,
        cookie,
        Some(NavEvent::SetComparison { models: req.models }),
    )
}

/// `POST /api/event` — any tagged [`NavEvent`].
pub fn post_event(app: &mut App, cookie: Option<&str>, body: &str) -> Result<Reply> {
    let event: NavEvent = parse_body(body)?;
    page_reply(app, cookie, Some(event))
}

// ---------------------------------------------------------------------------
// Stateless handlers
// ---------------------------------------------------------------------------

/// `GET /api/catalog` — all models and the metric order.
pub fn get_catalog(app: &App) -> Result<Reply> {
    json_response(&CatalogResponse {
        metrics: Metric::labels(),
        models: app.catalog.iter().collect(),
    })
}

/// `GET /api/best` — the model with the highest accuracy.
pub fn get_best(app: &App) -> Result<Reply> {
    let dashboard = render::dashboard_view(&app.catalog, &[])?;
    let model = app.catalog.best_by_accuracy();
    json_response(&BestResponse {
        model,
        cards: dashboard.best.cards,
    })
}

/// `GET /api/chart?model=NAME` or `GET /api/chart?compare=A,B`.
///
/// `format=svg` returns the rendered chart instead of the spec.
pub fn get_chart(app: &App, url: &str) -> Result<Reply> {
    let params = query_pairs(url);
    let get = |key: &str| {
        params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
    };

    let models = get("model");
    let compare: Vec<&str> = get("compare")
        .into_iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let spec: ChartSpec = match (models.first(), params.iter().any(|(k, _)| k == "compare")) {
        (Some(model), false) => chart::single_model_chart(&app.catalog, model)?,
        (None, true) => chart::comparison_chart(&app.catalog, &compare)?,
        (Some(_), true) => {
            return Err(BadRequest("use either 'model' or 'compare', not both".into()).into());
        }
        (None, false) => {
            return Err(BadRequest("missing 'model' or 'compare' parameter".into()).into());
        }
    };

    match get("format").first().copied() {
        Some("svg") => Ok(Reply::svg(svg::render_chart(&spec))),
        None | Some("json") => json_response(&spec),
        Some(other) => Err(BadRequest(format!("unsupported format '{other}'")).into()),
    }
}

/// `GET /api/health` — server status summary.
pub fn get_health(app: &App) -> Result<Reply> {
    json_response(&HealthResponse {
        status: "ok",
        models: app.catalog.len(),
        sessions: app.sessions.len(),
        sidebar_image: app.chrome.image.is_some(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_decodes_values() {
        let pairs = query_pairs("/api/chart?model=Random%20Forest&format=svg");
        assert_eq!(
            pairs,
            vec![
                ("model".to_string(), "Random Forest".to_string()),
                ("format".to_string(), "svg".to_string()),
            ]
        );
        assert!(query_pairs("/api/chart").is_empty());
        assert_eq!(query_pairs("/api/chart?compare=SVM,Naive+Bayes")[0].1, "SVM,Naive Bayes");
    }

    #[test]
    fn describe_summarizes_events() {
        assert_eq!(describe(&NavEvent::SetView { view: View::Models }), "view=MODELS");
        assert_eq!(
            describe(&NavEvent::SetComparison {
                models: vec!["SVM".into(), "Naive Bayes".into()]
            }),
            "compare=SVM,Naive Bayes"
        );
    }

    #[test]
    fn comparison_request_deserializes() {
        let req: ComparisonRequest =
            serde_json::from_str(r#"{"models": ["SVM", "Random Forest"]}"#).unwrap();
        assert_eq!(req.models, vec!["SVM", "Random Forest"]);
    }

    #[test]
    fn bad_request_message() {
        assert_eq!(
            BadRequest("missing".into()).to_string(),
            "bad request: missing"
        );
    }
}
