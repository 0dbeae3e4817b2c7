//! View rendering.
//!
//! [`render_page`] is a pure function of the catalog, a session state and the
//! page chrome. It produces a serializable [`Page`] describing everything the
//! active view shows; [`html`] turns that into markup. Rendering never
//! mutates state, so it can be exercised without a server.

pub mod html;

use serde::Serialize;

use crate::catalog::{Metric, ModelCatalog, ModelRecord};
use crate::chart::{self, ChartSpec};
use crate::error::DashError;
use crate::session::{SessionState, View};
use crate::utils::html::{percent, score};

/// Shown instead of the comparison chart when nothing is selected.
pub const EMPTY_COMPARISON_MESSAGE: &str = "Select at least one model to compare.";

const BEST_MODEL_CAPTION: &str = "This model has the highest accuracy among all models.";

// ---------------------------------------------------------------------------
// Page model
// ---------------------------------------------------------------------------

/// Static page decoration: titles and the optional sidebar image.
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub page_title: String,
    pub sidebar_title: String,
    pub heading: String,
    /// `data:` URI of the decorative image, if one was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            page_title: "Malware Detection System".to_string(),
            sidebar_title: "HacoHolics".to_string(),
            heading: "AI/ML Malware Detection System".to_string(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub view: View,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub metric: Metric,
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

/// A model entry in a selection control.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOption {
    pub name: String,
    pub color: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestModelPanel {
    pub name: String,
    pub color: String,
    pub cards: Vec<MetricCard>,
    pub caption: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub best: BestModelPanel,
    /// Multi-select options; `active` marks the comparison set.
    pub options: Vec<ModelOption>,
    /// Comparison names in selection order.
    pub selected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsView {
    /// One selector per model; `active` marks the selected one.
    pub options: Vec<ModelOption>,
    pub selected: String,
    pub details: Vec<MetricCard>,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBody {
    Dashboard(DashboardView),
    Models(ModelsView),
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub view: View,
    pub chrome: Chrome,
    pub nav: Vec<NavItem>,
    pub body: ViewBody,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the active view of `state`.
pub fn render_page(
    catalog: &ModelCatalog,
    state: &SessionState,
    chrome: &Chrome,
) -> Result<Page, DashError> {
    let nav = View::ALL
        .iter()
        .map(|&view| NavItem {
            view,
            label: view.tag(),
            active: view == state.view(),
        })
        .collect();

    let body = match state.view() {
        View::Dashboard => ViewBody::Dashboard(dashboard_view(catalog, state.comparison())?),
        View::Models => ViewBody::Models(models_view(catalog, state.selected_model())?),
    };

    Ok(Page {
        view: state.view(),
        chrome: chrome.clone(),
        nav,
        body,
    })
}

/// Best-model summary plus the comparison of `selected`.
pub fn dashboard_view(
    catalog: &ModelCatalog,
    selected: &[String],
) -> Result<DashboardView, DashError> {
    let best = catalog.best_by_accuracy();

    let (chart, empty_message) = if selected.is_empty() {
        (None, Some(EMPTY_COMPARISON_MESSAGE))
    } else {
        (Some(chart::comparison_chart(catalog, selected)?), None)
    };

    Ok(DashboardView {
        best: BestModelPanel {
            name: best.name.clone(),
            color: best.color.clone(),
            cards: metric_cards(best, percent),
            caption: BEST_MODEL_CAPTION,
        },
        options: model_options(catalog, |name| selected.iter().any(|s| s == name)),
        selected: selected.to_vec(),
        chart,
        empty_message,
    })
}

/// Selector list, details and chart for one model.
pub fn models_view(catalog: &ModelCatalog, selected: &str) -> Result<ModelsView, DashError> {
    let record = catalog
        .get(selected)
        .ok_or_else(|| DashError::UnknownModel(selected.to_string()))?;

    Ok(ModelsView {
        options: model_options(catalog, |name| name == selected),
        selected: record.name.clone(),
        details: metric_cards(record, score),
        chart: chart::single_model_chart(catalog, selected)?,
    })
}

fn metric_cards(record: &ModelRecord, format: fn(f64) -> String) -> Vec<MetricCard> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = record.score(metric);
            MetricCard {
                metric,
                label: metric.label(),
                value,
                display: format(value),
            }
        })
        .collect()
}

fn model_options(catalog: &ModelCatalog, is_active: impl Fn(&str) -> bool) -> Vec<ModelOption> {
    catalog
        .iter()
        .map(|r| ModelOption {
            name: r.name.clone(),
            color: r.color.clone(),
            active: is_active(&r.name),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
