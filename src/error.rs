//! Error taxonomy for the dashboard domain.
//!
//! Catalog, chart and navigation operations return [`DashError`] so callers
//! (the HTTP layer in particular) can map each failure to a status code.
//! Process-level plumbing wraps these in `anyhow::Error`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    /// A chart was requested for a model that is not in the catalog.
    #[error("unknown model: '{0}'")]
    UnknownModel(String),

    /// A navigation event tried to select a model that is not in the catalog.
    #[error("invalid model selection: '{0}' is not in the catalog")]
    InvalidModel(String),

    /// A comparison chart was requested with no models.
    #[error("no models selected for comparison")]
    EmptySelection,

    /// A view tag other than `DASHBOARD` or `MODELS`.
    #[error("unknown view: '{0}'")]
    UnknownView(String),

    #[error("invalid model catalog: {0}")]
    InvalidCatalog(String),

    /// A startup asset could not be read.
    #[error("failed to load resource {}: {source}", path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashError {
    /// HTTP status code used when this error escapes an API handler.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownModel(_) => 404,
            Self::InvalidModel(_) | Self::EmptySelection | Self::UnknownView(_) => 400,
            Self::InvalidCatalog(_) | Self::ResourceLoad { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_split_client_and_server_errors() {
        assert_eq!(DashError::UnknownModel("x".into()).status_code(), 404);
        assert_eq!(DashError::InvalidModel("x".into()).status_code(), 400);
        assert_eq!(DashError::EmptySelection.status_code(), 400);
        assert_eq!(DashError::InvalidCatalog("dup".into()).status_code(), 500);
    }

    #[test]
    fn resource_load_message_includes_path() {
        let err = DashError::ResourceLoad {
            path: PathBuf::from("/tmp/missing.gif"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.gif"));
    }
}
