//! Chart derivation.
//!
//! Pure functions that turn catalog lookups into a [`ChartSpec`], a
//! rendering-library-independent description of a bar chart. The
//! [`svg`] submodule draws a spec; nothing in here touches the session.

pub mod svg;

use serde::Serialize;

use crate::catalog::{Metric, ModelCatalog, ModelRecord};
use crate::error::DashError;

/// Title used for the grouped comparison chart.
pub const COMPARISON_TITLE: &str = "Model Performance Comparison";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One series, one bar per category.
    Bar,
    /// One group of bars per category, one bar per series.
    GroupedBar,
}

/// One colored series of values, aligned with [`ChartSpec::categories`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
}

impl Series {
    fn from_record(record: &ModelRecord) -> Self {
        Self {
            name: record.name.clone(),
            color: record.color.clone(),
            values: record.scores().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Fixed metric axis range.
    pub value_range: [f64; 2],
    pub x_title: String,
    pub y_title: String,
    /// Draw the numeric value above each bar.
    pub show_values: bool,
}

impl ChartSpec {
    fn new(title: String, kind: ChartKind, series: Vec<Series>, show_values: bool) -> Self {
        Self {
            title,
            kind,
            categories: Metric::labels().into_iter().map(String::from).collect(),
            series,
            value_range: [0.0, 1.0],
            x_title: "Metrics".to_string(),
            y_title: "Score".to_string(),
            show_values,
        }
    }

    /// `(category, value)` pairs of the first series.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        let Some(first) = self.series.first() else {
            return Vec::new();
        };
        self.categories
            .iter()
            .map(String::as_str)
            .zip(first.values.iter().copied())
            .collect()
    }
}

/// Bar chart of the four metrics of a single model, colored by the model.
pub fn single_model_chart(catalog: &ModelCatalog, name: &str) -> Result<ChartSpec, DashError> {
    let record = catalog
        .get(name)
        .ok_or_else(|| DashError::UnknownModel(name.to_string()))?;

    Ok(ChartSpec::new(
        format!("{} Performance Metrics", record.name),
        ChartKind::Bar,
        vec![Series::from_record(record)],
        true,
    ))
}

/// Grouped bar chart with one series per model, in the order given.
///
/// Repeated names collapse to their first occurrence.
pub fn comparison_chart<S: AsRef<str>>(
    catalog: &ModelCatalog,
    names: &[S],
) -> Result<ChartSpec, DashError> {
    if names.is_empty() {
        return Err(DashError::EmptySelection);
    }

    let mut unique: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name.as_ref()) {
            unique.push(name.as_ref());
        }
    }

    let series = unique
        .into_iter()
        .map(|name| {
            catalog
                .get(name)
                .map(Series::from_record)
                .ok_or_else(|| DashError::UnknownModel(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChartSpec::new(
        COMPARISON_TITLE.to_string(),
        ChartKind::GroupedBar,
        series,
        false,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chart_matches_catalog_scores() {
        let catalog = ModelCatalog::builtin();
        for record in catalog.iter() {
            let chart = single_model_chart(&catalog, &record.name).unwrap();
            assert_eq!(chart.kind, ChartKind::Bar);
            assert_eq!(
                chart.pairs(),
                vec![
                    ("Accuracy", record.accuracy),
                    ("Precision", record.precision),
                    ("Recall", record.recall),
                    ("F1 Score", record.f1),
                ]
            );
            assert_eq!(chart.series[0].color, record.color);
        }
    }

    #[test]
    fn single_chart_title_names_model() {
        let chart = single_model_chart(&ModelCatalog::builtin(), "SVM").unwrap();
        assert_eq!(chart.title, "SVM Performance Metrics");
        assert_eq!(chart.value_range, [0.0, 1.0]);
        assert!(chart.show_values);
    }

    #[test]
    fn single_chart_rejects_unknown_model() {
        let err = single_model_chart(&ModelCatalog::builtin(), "Nonexistent").unwrap_err();
        assert!(matches!(err, DashError::UnknownModel(name) if name == "Nonexistent"));
    }

    #[test]
    fn comparison_keeps_caller_order() {
        let catalog = ModelCatalog::builtin();
        let chart = comparison_chart(&catalog, &["SVM", "Naive Bayes"]).unwrap();
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SVM", "Naive Bayes"]);
        assert_eq!(chart.kind, ChartKind::GroupedBar);
        assert_eq!(chart.title, COMPARISON_TITLE);
    }

    #[test]
    fn comparison_series_equal_single_charts() {
        let catalog = ModelCatalog::builtin();
        let chart = comparison_chart(&catalog, &["Random Forest", "Logistic Regression"]).unwrap();
        assert_eq!(chart.series.len(), 2);
        for series in &chart.series {
            let single = single_model_chart(&catalog, &series.name).unwrap();
            assert_eq!(series, &single.series[0]);
        }
    }

    #[test]
    fn comparison_collapses_repeated_names() {
        let catalog = ModelCatalog::builtin();
        let chart = comparison_chart(&catalog, &["SVM", "Naive Bayes", "SVM"]).unwrap();
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SVM", "Naive Bayes"]);
    }

    #[test]
    fn comparison_rejects_empty_selection() {
        let empty: [&str; 0] = [];
        let err = comparison_chart(&ModelCatalog::builtin(), &empty).unwrap_err();
        assert!(matches!(err, DashError::EmptySelection));
    }

    #[test]
    fn comparison_rejects_unknown_member() {
        let err = comparison_chart(&ModelCatalog::builtin(), &["SVM", "KNN"]).unwrap_err();
        assert!(matches!(err, DashError::UnknownModel(name) if name == "KNN"));
    }

    #[test]
    fn derivation_is_deterministic() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            comparison_chart(&catalog, &["SVM", "Random Forest"]).unwrap(),
            comparison_chart(&catalog, &["SVM", "Random Forest"]).unwrap()
        );
    }
}
