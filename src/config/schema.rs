/// Configuration schema and defaults for metricdash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[server]`, `[appearance]`, `[session]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::render::Chrome;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level metricdash configuration.
///
/// Maps directly to `~/.metricdash/config.toml` and `.metricdash.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerConfig,
    pub appearance: AppearanceConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `metricdash serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on startup.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [appearance]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Browser tab title.
    pub page_title: String,
    /// Title shown at the top of the sidebar.
    pub sidebar_title: String,
    /// Main heading above the active view.
    pub heading: String,
    /// Optional decorative image shown in the sidebar. Loaded once at
    /// startup; a missing or unreadable file aborts `serve`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_image: Option<PathBuf>,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        let chrome = Chrome::default();
        Self {
            page_title: chrome.page_title,
            sidebar_title: chrome.sidebar_title,
            heading: chrome.heading,
            sidebar_image: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle for longer than this are discarded.
    pub idle_timeout_secs: u64,
    /// Upper bound on live sessions; the least recently seen is evicted.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            max_sessions: 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Console verbosity, ordered from quietest to loudest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether the JSONL access log is written.
    pub enabled: bool,
    /// Path to the access log file. `~` is expanded to the home directory.
    pub path: String,
    /// Console log level: `"error"`, `"warn"`, `"info"`, `"debug"`.
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.metricdash/access-log.jsonl".to_string(),
            level: LogLevel::default(),
        }
    }
}

impl LoggingConfig {
    /// Access log path with a leading `~` expanded.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None if self.path == "~" => dirs::home_dir(),
            None => Some(PathBuf::from(&self.path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Page chrome without the image; the image is attached once loaded.
    pub fn chrome(&self) -> Chrome {
        Chrome {
            page_title: self.appearance.page_title.clone(),
            sidebar_title: self.appearance.sidebar_title.clone(),
            heading: self.appearance.heading.clone(),
            image: None,
        }
    }

    /// Annotated default configuration written by `metricdash config init`.
    pub fn default_toml() -> String {
        r#"# metricdash Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (METRICDASH_*)
#   2. Project config (.metricdash.toml in current directory)
#   3. User global config (~/.metricdash/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:8501"
open_browser = true

[appearance]
page_title = "Malware Detection System"
sidebar_title = "HacoHolics"
heading = "AI/ML Malware Detection System"
# sidebar_image = "/path/to/animation.gif"   # must exist, or serve refuses to start

[session]
idle_timeout_secs = 3600
max_sessions = 1024

[logging]
enabled = true
path = "~/.metricdash/access-log.jsonl"
level = "info"   # error | warn | info | debug
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_matches_defaults() {
        let parsed: DashConfig = toml::from_str(&DashConfig::default_toml()).unwrap();
        assert_eq!(parsed, DashConfig::default());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: DashConfig = toml::from_str(
            r#"
[server]
addr = "0.0.0.0:9000"
"#,
        )
        .unwrap();
        assert_eq!(parsed.server.addr, "0.0.0.0:9000");
        assert!(parsed.server.open_browser);
        assert_eq!(parsed.session, SessionConfig::default());
    }

    #[test]
    fn log_levels_are_ordered() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debug);
        let parsed: LoggingConfig = toml::from_str(r#"level = "debug""#).unwrap();
        assert_eq!(parsed.level, LogLevel::Debug);
    }

    #[test]
    fn resolved_path_keeps_absolute_paths() {
        let cfg = LoggingConfig {
            path: "/var/log/metricdash.jsonl".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(
            cfg.resolved_path(),
            Some(PathBuf::from("/var/log/metricdash.jsonl"))
        );
    }

    #[test]
    fn chrome_copies_titles() {
        let mut cfg = DashConfig::default();
        cfg.appearance.heading = "Threat Models".to_string();
        let chrome = cfg.chrome();
        assert_eq!(chrome.heading, "Threat Models");
        assert!(chrome.image.is_none());
    }
}
