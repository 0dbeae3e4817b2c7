//! Inline SVG rendering of a [`ChartSpec`].
//!
//! Produces a self-contained `<svg>` element styled for the dark dashboard
//! theme. Output depends only on the spec, so two renders of the same spec
//! are byte-identical.

use super::{ChartKind, ChartSpec};
use crate::utils::html::escape;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 64.0;
const GRID_STEPS: usize = 5;
/// Fraction of each category slot occupied by bars.
const GROUP_FILL: f64 = 0.8;

const TEXT_COLOR: &str = "#00d4ff";
const GRID_COLOR: &str = "rgba(0,212,255,0.1)";

/// Render a chart spec as an SVG string.
pub fn render_chart(spec: &ChartSpec) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let [lo, hi] = spec.value_range;
    let span = if hi > lo { hi - lo } else { 1.0 };

    let y_of = |value: f64| {
        let clamped = value.clamp(lo, hi);
        MARGIN_TOP + plot_h - (clamped - lo) / span * plot_h
    };

    let mut svg = format!(
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{title}">"#,
        title = escape(&spec.title),
    );

    svg.push_str(&format!(
        r#"<text class="chart-title" x="{x}" y="28" text-anchor="middle" fill="{TEXT_COLOR}" font-size="22">{title}</text>"#,
        x = WIDTH / 2.0,
        title = escape(&spec.title),
    ));

    // Gridlines and value axis ticks
    for step in 0..=GRID_STEPS {
        let value = lo + span * step as f64 / GRID_STEPS as f64;
        let y = y_of(value);
        svg.push_str(&format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="{GRID_COLOR}"/>"#,
            x2 = MARGIN_LEFT + plot_w,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="end" fill="{TEXT_COLOR}" font-size="12">{value:.1}</text>"#,
            x = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
        ));
    }

    // Bars
    let categories = spec.categories.len().max(1);
    let slot_w = plot_w / categories as f64;
    let series_count = spec.series.len().max(1);
    let bar_w = slot_w * GROUP_FILL / series_count as f64;

    for (ci, category) in spec.categories.iter().enumerate() {
        let slot_x = MARGIN_LEFT + slot_w * ci as f64;
        let group_x = slot_x + slot_w * (1.0 - GROUP_FILL) / 2.0;

        for (si, series) in spec.series.iter().enumerate() {
            let Some(&value) = series.values.get(ci) else {
                continue;
            };
            let x = group_x + bar_w * si as f64;
            let y = y_of(value);
            let h = MARGIN_TOP + plot_h - y;
            svg.push_str(&format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{name} · {category}: {value:.4}</title></rect>"#,
                w = bar_w,
                color = escape(&series.color),
                name = escape(&series.name),
                category = escape(category),
            ));
            if spec.show_values {
                svg.push_str(&format!(
                    r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" fill="{TEXT_COLOR}" font-size="13">{value:.4}</text>"#,
                    cx = x + bar_w / 2.0,
                    ty = y - 6.0,
                ));
            }
        }

        svg.push_str(&format!(
            r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" fill="{TEXT_COLOR}" font-size="13">{label}</text>"#,
            cx = slot_x + slot_w / 2.0,
            ty = MARGIN_TOP + plot_h + 20.0,
            label = escape(category),
        ));
    }

    // Axis titles
    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" fill="{TEXT_COLOR}" font-size="14">{title}</text>"#,
        x = MARGIN_LEFT + plot_w / 2.0,
        y = HEIGHT - 16.0,
        title = escape(&spec.x_title),
    ));
    svg.push_str(&format!(
        r#"<text x="18" y="{y:.1}" text-anchor="middle" fill="{TEXT_COLOR}" font-size="14" transform="rotate(-90 18 {y:.1})">{title}</text>"#,
        y = MARGIN_TOP + plot_h / 2.0,
        title = escape(&spec.y_title),
    ));

    if spec.kind == ChartKind::GroupedBar {
        svg.push_str(&legend(spec));
    }

    svg.push_str("</svg>");
    svg
}

/// Legend entries stacked in the top-right corner.
fn legend(spec: &ChartSpec) -> String {
    let mut out = String::new();
    let x = WIDTH - MARGIN_RIGHT - 170.0;
    for (i, series) in spec.series.iter().enumerate() {
        let y = MARGIN_TOP + 4.0 + 18.0 * i as f64;
        out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}" fill="{TEXT_COLOR}" font-size="12">{name}</text>"#,
            color = escape(&series.color),
            tx = x + 18.0,
            ty = y + 10.0,
            name = escape(&series.name),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelCatalog;
    use crate::chart::{comparison_chart, single_model_chart};

    #[test]
    fn single_chart_has_four_bars_and_labels() {
        let spec = single_model_chart(&ModelCatalog::builtin(), "SVM").unwrap();
        let svg = render_chart(&spec);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("0.9752"));
        assert!(svg.contains("fill=\"#0000ff\""));
        assert!(svg.contains("SVM Performance Metrics"));
    }

    #[test]
    fn grouped_chart_has_bars_per_series_and_legend() {
        let spec = comparison_chart(&ModelCatalog::builtin(), &["SVM", "Naive Bayes"]).unwrap();
        let svg = render_chart(&spec);
        // 2 series × 4 metrics + 2 legend swatches
        assert_eq!(svg.matches("<rect").count(), 10);
        assert!(svg.contains(">Naive Bayes</text>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let spec = comparison_chart(&ModelCatalog::builtin(), &["Random Forest"]).unwrap();
        assert_eq!(render_chart(&spec), render_chart(&spec));
    }

    #[test]
    fn text_is_escaped() {
        let mut spec = single_model_chart(&ModelCatalog::builtin(), "SVM").unwrap();
        spec.title = "<script>".to_string();
        let svg = render_chart(&spec);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }
}
