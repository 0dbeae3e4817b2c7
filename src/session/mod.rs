//! Per-session navigation and selection state.
//!
//! A [`SessionState`] holds which view is active, the single model shown on
//! the Models view, and the comparison set of the Dashboard view. The three
//! fields are independent: navigating between views never resets a
//! selection. Mutations are pure and never trigger rendering; callers
//! re-render explicitly after applying a [`NavEvent`].

pub mod store;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelCatalog;
use crate::error::DashError;

pub use store::SessionStore;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The two navigable views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum View {
    #[default]
    Dashboard,
    Models,
}

impl View {
    pub const ALL: [View; 2] = [View::Dashboard, View::Models];

    /// Sidebar tag, also the wire representation.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Dashboard => "DASHBOARD",
            Self::Models => "MODELS",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for View {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DASHBOARD" => Ok(Self::Dashboard),
            "MODELS" => Ok(Self::Models),
            _ => Err(DashError::UnknownView(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A user navigation or selection action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEvent {
    SetView { view: View },
    SelectModel { model: String },
    SetComparison { models: Vec<String> },
}

/// What applying a [`NavEvent`] did to the state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavOutcome {
    /// Whether any field of the state changed.
    pub changed: bool,
    /// Comparison names dropped because they are not in the catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    view: View,
    selected_model: String,
    comparison: Vec<String>,
}

impl SessionState {
    /// Fresh state: Dashboard view, first catalog model selected, first two
    /// catalog models compared.
    pub fn new(catalog: &ModelCatalog) -> Self {
        let names = catalog.names();
        Self {
            view: View::default(),
            selected_model: names.first().cloned().unwrap_or_default(),
            comparison: names.into_iter().take(2).collect(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn comparison(&self) -> &[String] {
        &self.comparison
    }

    /// Switch the active view. Returns `true` if the view changed.
    pub fn set_view(&mut self, view: View) -> bool {
        let changed = self.view != view;
        self.view = view;
        changed
    }

    /// Select the model shown on the Models view.
    ///
    /// Unknown names fail with [`DashError::InvalidModel`] and leave the
    /// state untouched. Returns `true` if the selection changed.
    pub fn set_selected_model(
        &mut self,
        catalog: &ModelCatalog,
        name: &str,
    ) -> Result<bool, DashError> {
        if !catalog.contains(name) {
            return Err(DashError::InvalidModel(name.to_string()));
        }
        let changed = self.selected_model != name;
        if changed {
            self.selected_model = name.to_string();
        }
        Ok(changed)
    }

    /// Replace the Dashboard comparison set.
    ///
    /// Names not in the catalog are dropped and returned. Repeated names
    /// keep their first position. An empty set is accepted.
    pub fn set_comparison_set<S: AsRef<str>>(
        &mut self,
        catalog: &ModelCatalog,
        names: &[S],
    ) -> Vec<String> {
        let mut kept: Vec<String> = Vec::with_capacity(names.len());
        let mut dropped = Vec::new();

        for name in names {
            let name = name.as_ref();
            if !catalog.contains(name) {
                dropped.push(name.to_string());
            } else if !kept.iter().any(|k| k == name) {
                kept.push(name.to_string());
            }
        }

        self.comparison = kept;
        dropped
    }

    /// Apply a navigation event.
    pub fn apply(
        &mut self,
        catalog: &ModelCatalog,
        event: &NavEvent,
    ) -> Result<NavOutcome, DashError> {
        match event {
            NavEvent::SetView { view } => Ok(NavOutcome {
                changed: self.set_view(*view),
                dropped: Vec::new(),
            }),
            NavEvent::SelectModel { model } => Ok(NavOutcome {
                changed: self.set_selected_model(catalog, model)?,
                dropped: Vec::new(),
            }),
            NavEvent::SetComparison { models } => {
                let before = self.comparison.clone();
                let dropped = self.set_comparison_set(catalog, models);
                Ok(NavOutcome {
                    changed: before != self.comparison,
                    dropped,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (ModelCatalog, SessionState) {
        let catalog = ModelCatalog::builtin();
        let state = SessionState::new(&catalog);
        (catalog, state)
    }

    #[test]
    fn defaults_follow_catalog_order() {
        let (_, state) = fresh();
        assert_eq!(state.view(), View::Dashboard);
        assert_eq!(state.selected_model(), "Random Forest");
        assert_eq!(state.comparison(), ["Random Forest", "Naive Bayes"]);
    }

    #[test]
    fn view_parses_tags_case_insensitively() {
        assert_eq!("DASHBOARD".parse::<View>().unwrap(), View::Dashboard);
        assert_eq!("models".parse::<View>().unwrap(), View::Models);
        assert!(matches!(
            "settings".parse::<View>(),
            Err(DashError::UnknownView(_))
        ));
    }

    #[test]
    fn set_view_reports_change_once() {
        let (_, mut state) = fresh();
        assert!(state.set_view(View::Models));
        assert!(!state.set_view(View::Models));
        assert_eq!(state.view(), View::Models);
    }

    #[test]
    fn set_selected_model_is_idempotent() {
        let (catalog, mut state) = fresh();
        assert!(state.set_selected_model(&catalog, "SVM").unwrap());
        let once = state.clone();
        assert!(!state.set_selected_model(&catalog, "SVM").unwrap());
        assert_eq!(state, once);
    }

    #[test]
    fn set_selected_model_rejects_unknown_without_mutation() {
        let (catalog, mut state) = fresh();
        state.set_selected_model(&catalog, "Naive Bayes").unwrap();
        let before = state.clone();
        let err = state
            .set_selected_model(&catalog, "NonexistentModel")
            .unwrap_err();
        assert!(matches!(err, DashError::InvalidModel(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn comparison_set_filters_unknown_and_duplicates() {
        let (catalog, mut state) = fresh();
        let dropped = state.set_comparison_set(&catalog, &["SVM", "KNN", "SVM", "Naive Bayes"]);
        assert_eq!(dropped, vec!["KNN"]);
        assert_eq!(state.comparison(), ["SVM", "Naive Bayes"]);
    }

    #[test]
    fn comparison_set_may_be_emptied() {
        let (catalog, mut state) = fresh();
        let empty: [&str; 0] = [];
        assert!(state.set_comparison_set(&catalog, &empty).is_empty());
        assert!(state.comparison().is_empty());
    }

    #[test]
    fn navigation_round_trip_preserves_selections() {
        let (catalog, mut state) = fresh();
        state.set_comparison_set(&catalog, &["Logistic Regression", "SVM"]);
        state.set_view(View::Models);
        state.set_selected_model(&catalog, "Naive Bayes").unwrap();
        state.set_view(View::Dashboard);

        assert_eq!(state.comparison(), ["Logistic Regression", "SVM"]);
        assert_eq!(state.selected_model(), "Naive Bayes");
    }

    #[test]
    fn apply_reports_outcome() {
        let (catalog, mut state) = fresh();
        let outcome = state
            .apply(
                &catalog,
                &NavEvent::SetComparison {
                    models: vec!["SVM".into(), "Bogus".into()],
                },
            )
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.dropped, vec!["Bogus"]);

        let outcome = state
            .apply(&catalog, &NavEvent::SetView { view: View::Dashboard })
            .unwrap();
        assert!(!outcome.changed);
    }

    #[test]
    fn nav_event_deserializes_from_tagged_json() {
        let event: NavEvent =
            serde_json::from_str(r#"{"type":"set_view","view":"MODELS"}"#).unwrap();
        assert_eq!(event, NavEvent::SetView { view: View::Models });

        let event: NavEvent =
            serde_json::from_str(r#"{"type":"select_model","model":"SVM"}"#).unwrap();
        assert_eq!(
            event,
            NavEvent::SelectModel {
                model: "SVM".into()
            }
        );
    }
}
