//! HTML fragments for a rendered [`Page`].
//!
//! The frontend swaps these into its sidebar and main panel after every
//! interaction. Controls carry `data-*` attributes the frontend binds to:
//! `data-view` on nav buttons, `data-model` on model selectors and
//! `data-compare` on comparison checkboxes.

use super::{DashboardView, MetricCard, ModelsView, NavItem, Page, ViewBody};
use crate::chart::svg::render_chart;
use crate::utils::html::escape;

/// Sidebar navigation buttons.
pub fn nav_html(nav: &[NavItem]) -> String {
    nav.iter()
        .map(|item| {
            format!(
                r#"<button class="nav-btn{active}" data-view="{tag}">{label}</button>"#,
                active = if item.active { " active" } else { "" },
                tag = item.view.tag(),
                label = escape(item.label),
            )
        })
        .collect()
}

/// Main panel content for the active view.
pub fn body_html(page: &Page) -> String {
    match &page.body {
        ViewBody::Dashboard(view) => dashboard_html(view),
        ViewBody::Models(view) => models_html(view),
    }
}

fn dashboard_html(view: &DashboardView) -> String {
    let best = &view.best;
    let color = escape(&best.color);

    let mut out = String::from(
        "<section class=\"best\"><h3>Best Performing Model</h3>\
         <p class=\"muted\">Here are the results for the model with the highest accuracy:</p>\
         <div class=\"cards\">",
    );
    for card in &best.cards {
        out.push_str(&metric_card_html(card, &color));
    }
    out.push_str("</div>");
    out.push_str(&format!(
        r#"<div class="best-panel" style="border-color:{color};box-shadow:0 0 10px {color},0 0 20px {color}"><h3 style="color:{color}">{name}</h3><p>{caption}</p></div></section>"#,
        name = escape(&best.name),
        caption = escape(best.caption),
    ));

    out.push_str(
        "<section class=\"compare\"><h3>Model Comparison</h3>\
         <p class=\"muted\">Select models to compare their performance metrics:</p>\
         <div class=\"multiselect\">",
    );
    for option in &view.options {
        out.push_str(&format!(
            r#"<label class="chip" style="--chip:{color}"><input type="checkbox" data-compare="{name}"{checked}><span>{name}</span></label>"#,
            color = escape(&option.color),
            name = escape(&option.name),
            checked = if option.active { " checked" } else { "" },
        ));
    }
    out.push_str("</div>");

    match (&view.chart, view.empty_message) {
        (Some(chart), _) => {
            out.push_str("<div class=\"chart-wrap\">");
            out.push_str(&render_chart(chart));
            out.push_str("</div>");
        }
        (None, Some(message)) => {
            out.push_str(&format!(r#"<p class="empty">{}</p>"#, escape(message)));
        }
        (None, None) => {}
    }
    out.push_str("</section>");
    out
}

fn models_html(view: &ModelsView) -> String {
    let mut out = String::from(
        "<section class=\"models\"><h3>Model Performance Metrics</h3>\
         <div class=\"models-grid\"><div class=\"selector\"><h4>Select Model</h4>",
    );
    for option in &view.options {
        out.push_str(&format!(
            r#"<button class="model-btn{active}" data-model="{name}">{name}</button>"#,
            active = if option.active { " active" } else { "" },
            name = escape(&option.name),
        ));
    }
    out.push_str("</div><div class=\"detail\"><div class=\"chart-wrap\">");
    out.push_str(&render_chart(&view.chart));
    out.push_str(&format!(
        r#"</div><div class="metrics-card"><h3>Model Details: {name}</h3><p>Performance Metrics:</p><ul>"#,
        name = escape(&view.selected),
    ));
    for card in &view.details {
        out.push_str(&format!(
            "<li>{}: {}</li>",
            escape(card.label),
            escape(&card.display)
        ));
    }
    out.push_str("</ul></div></div></div></section>");
    out
}

fn metric_card_html(card: &MetricCard, color: &str) -> String {
    format!(
        r#"<div class="metric-card" style="border-color:{color}"><h3 style="color:{color}">{label}</h3><p style="color:{color}">{value}</p></div>"#,
        label = escape(card.label),
        value = escape(&card.display),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelCatalog;
    use crate::render::{Chrome, render_page};
    use crate::session::{SessionState, View};

    #[test]
    fn dashboard_html_contains_best_model_and_chart() {
        let catalog = ModelCatalog::builtin();
        let state = SessionState::new(&catalog);
        let page = render_page(&catalog, &state, &Chrome::default()).unwrap();
        let html = body_html(&page);
        assert!(html.contains("Best Performing Model"));
        assert!(html.contains(">SVM</h3>"));
        assert!(html.contains("97.52%"));
        assert!(html.contains("<svg"));
        assert_eq!(html.matches("data-compare=").count(), 4);
        assert_eq!(html.matches(" checked").count(), 2);
    }

    #[test]
    fn empty_comparison_shows_message() {
        let catalog = ModelCatalog::builtin();
        let mut state = SessionState::new(&catalog);
        let empty: [&str; 0] = [];
        state.set_comparison_set(&catalog, &empty);
        let page = render_page(&catalog, &state, &Chrome::default()).unwrap();
        let html = body_html(&page);
        assert!(html.contains("Select at least one model to compare."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn models_html_lists_selectors_and_details() {
        let catalog = ModelCatalog::builtin();
        let mut state = SessionState::new(&catalog);
        state.set_view(View::Models);
        let page = render_page(&catalog, &state, &Chrome::default()).unwrap();
        let html = body_html(&page);
        assert_eq!(html.matches("data-model=").count(), 4);
        assert!(html.contains("Model Details: Random Forest"));
        assert!(html.contains("<li>Accuracy: 0.967</li>"));
    }

    #[test]
    fn nav_marks_active_view() {
        let catalog = ModelCatalog::builtin();
        let mut state = SessionState::new(&catalog);
        state.set_view(View::Models);
        let page = render_page(&catalog, &state, &Chrome::default()).unwrap();
        let nav = nav_html(&page.nav);
        assert!(nav.contains(r#"class="nav-btn active" data-view="MODELS""#));
        assert!(nav.contains(r#"class="nav-btn" data-view="DASHBOARD""#));
    }
}
