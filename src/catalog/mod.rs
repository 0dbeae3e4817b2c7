//! Static model catalog.
//!
//! The dashboard shows precomputed scores for a fixed set of classifiers.
//! Nothing here is computed: [`ModelCatalog::builtin`] returns literal
//! constants, and the catalog is read-only once constructed.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::DashError;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// One of the four reported classification metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 4] = [
        Metric::Accuracy,
        Metric::Precision,
        Metric::Recall,
        Metric::F1,
    ];

    /// Human-readable label used for chart categories and metric cards.
    pub fn label(self) -> &'static str {
        match self {
            Self::Accuracy => "Accuracy",
            Self::Precision => "Precision",
            Self::Recall => "Recall",
            Self::F1 => "F1 Score",
        }
    }

    /// Category labels for all metrics, in display order.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.label()).collect()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Precomputed scores for a single model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Display color as a `#rrggbb` hex string.
    pub color: String,
}

impl ModelRecord {
    pub fn new(
        name: &str,
        accuracy: f64,
        precision: f64,
        recall: f64,
        f1: f64,
        color: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            accuracy,
            precision,
            recall,
            f1,
            color: color.to_string(),
        }
    }

    pub fn score(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1 => self.f1,
        }
    }

    /// The four scores in [`Metric::ALL`] order.
    pub fn scores(&self) -> [f64; 4] {
        Metric::ALL.map(|m| self.score(m))
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered, read-only lookup table of model name → record.
///
/// Iteration order is insertion order. That order drives the default
/// selections of a fresh session and the tie-break of
/// [`best_by_accuracy`](Self::best_by_accuracy).
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    records: Vec<ModelRecord>,
}

impl ModelCatalog {
    /// Build a catalog, validating names and score ranges.
    pub fn new(records: Vec<ModelRecord>) -> Result<Self, DashError> {
        if records.is_empty() {
            return Err(DashError::InvalidCatalog("catalog is empty".into()));
        }

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.name.as_str()) {
                return Err(DashError::InvalidCatalog(format!(
                    "duplicate model name '{}'",
                    record.name
                )));
            }
            for metric in Metric::ALL {
                let value = record.score(metric);
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(DashError::InvalidCatalog(format!(
                        "{} of '{}' is {value}, expected a value in [0, 1]",
                        metric, record.name
                    )));
                }
            }
        }

        Ok(Self { records })
    }

    /// The sample malware-detection results shown by the dashboard.
    pub fn builtin() -> Self {
        Self {
            records: vec![
                ModelRecord::new("Random Forest", 0.9669, 0.9630, 0.9669, 0.9630, "#00ff00"),
                ModelRecord::new("Naive Bayes", 0.9421, 0.9443, 0.9421, 0.9421, "#ff0000"),
                ModelRecord::new("SVM", 0.9752, 0.9797, 0.9786, 0.9786, "#0000ff"),
                ModelRecord::new(
                    "Logistic Regression",
                    0.9339,
                    0.9288,
                    0.9339,
                    0.9303,
                    "#800080",
                ),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelRecord> {
        self.records.iter()
    }

    /// Model names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The model with the highest accuracy.
    ///
    /// Exact ties resolve to the model that appears first in the catalog.
    pub fn best_by_accuracy(&self) -> &ModelRecord {
        // `new` rejects empty catalogs and `builtin` is non-empty.
        let mut best = &self.records[0];
        for record in &self.records[1..] {
            if record.accuracy > best.accuracy {
                best = record;
            }
        }
        best
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_four_models_in_order() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec!["Random Forest", "Naive Bayes", "SVM", "Logistic Regression"]
        );
    }

    #[test]
    fn builtin_passes_validation() {
        let records: Vec<_> = ModelCatalog::builtin().iter().cloned().collect();
        assert!(ModelCatalog::new(records).is_ok());
    }

    #[test]
    fn best_by_accuracy_picks_svm() {
        let catalog = ModelCatalog::builtin();
        let best = catalog.best_by_accuracy();
        assert_eq!(best.name, "SVM");
        assert_eq!(best.accuracy, 0.9752);
    }

    #[test]
    fn best_by_accuracy_tie_goes_to_first_inserted() {
        let catalog = ModelCatalog::new(vec![
            ModelRecord::new("A", 0.5, 0.5, 0.5, 0.5, "#111111"),
            ModelRecord::new("B", 0.9, 0.1, 0.1, 0.1, "#222222"),
            ModelRecord::new("C", 0.9, 0.9, 0.9, 0.9, "#333333"),
        ])
        .unwrap();
        assert_eq!(catalog.best_by_accuracy().name, "B");
    }

    #[test]
    fn new_rejects_duplicates() {
        let result = ModelCatalog::new(vec![
            ModelRecord::new("A", 0.5, 0.5, 0.5, 0.5, "#111111"),
            ModelRecord::new("A", 0.6, 0.6, 0.6, 0.6, "#222222"),
        ]);
        assert!(matches!(result, Err(DashError::InvalidCatalog(_))));
    }

    #[test]
    fn new_rejects_out_of_range_scores() {
        let result = ModelCatalog::new(vec![ModelRecord::new(
            "A", 1.2, 0.5, 0.5, 0.5, "#111111",
        )]);
        assert!(matches!(result, Err(DashError::InvalidCatalog(_))));

        let result = ModelCatalog::new(vec![ModelRecord::new(
            "A",
            f64::NAN,
            0.5,
            0.5,
            0.5,
            "#111111",
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_empty() {
        assert!(ModelCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn scores_follow_metric_order() {
        let catalog = ModelCatalog::builtin();
        let rf = catalog.get("Random Forest").unwrap();
        assert_eq!(rf.scores(), [0.9669, 0.9630, 0.9669, 0.9630]);
        assert_eq!(Metric::labels(), vec!["Accuracy", "Precision", "Recall", "F1 Score"]);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = ModelCatalog::builtin();
        assert!(catalog.contains("SVM"));
        assert!(!catalog.contains("svm"));
    }
}
