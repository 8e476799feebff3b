//! Toolbox configuration.
//!
//! A [`ToolboxConfig`] carries everything the page knows at start-up: where
//! the mutation endpoint lives, the session token and course id injected into
//! every request, and the timing of busy indicators and focus restoration.
//!
//! # Example
//!
//! ```
//! use course_toolbox::ToolboxConfig;
//!
//! let config = ToolboxConfig::from_toml_str(r#"
//!     www_root = "https://school.example"
//!     course_id = 42
//!     session_key = "abc123"
//!
//!     [page_params]
//!     sr = "3"
//! "#).unwrap();
//!
//! assert_eq!(config.ajax_url, "/course/rest.php");
//! assert_eq!(config.endpoint_url().unwrap(), "https://school.example/course/rest.php");
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transport::SessionContext;

fn default_ajax_url() -> String {
    "/course/rest.php".to_string()
}

fn default_format() -> String {
    "topics".to_string()
}

fn default_busy_hide_delay_ms() -> u64 {
    400
}

fn default_focus_restore_delay_ms() -> u64 {
    100
}

/// Page-level configuration for a [`CourseToolbox`](crate::CourseToolbox).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolboxConfig {
    /// Site root, e.g. `https://school.example`.
    pub www_root: String,
    /// Endpoint path below `www_root`.
    #[serde(default = "default_ajax_url")]
    pub ajax_url: String,
    pub course_id: u64,
    /// Anti-forgery token sent as `sesskey`.
    pub session_key: String,
    /// Course format, used to pick section strings (`format_<format>`).
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_busy_hide_delay_ms")]
    pub busy_hide_delay_ms: u64,
    #[serde(default = "default_focus_restore_delay_ms")]
    pub focus_restore_delay_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    /// Extra parameters merged into every request.
    #[serde(default)]
    pub page_params: BTreeMap<String, String>,
}

impl ToolboxConfig {
    /// Start building a configuration from its required fields.
    pub fn builder(
        www_root: impl Into<String>,
        course_id: u64,
        session_key: impl Into<String>,
    ) -> ToolboxConfigBuilder {
        ToolboxConfigBuilder {
            config: Self {
                www_root: www_root.into(),
                ajax_url: default_ajax_url(),
                course_id,
                session_key: session_key.into(),
                format: default_format(),
                busy_hide_delay_ms: default_busy_hide_delay_ms(),
                focus_restore_delay_ms: default_focus_restore_delay_ms(),
                request_timeout_ms: None,
                page_params: BTreeMap::new(),
            },
        }
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::invalid("config", e.to_string()))
    }

    /// Check that the configuration can be used to talk to the server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.www_root)
            .map_err(|e| ConfigError::invalid("www_root", e.to_string()))?;
        if self.session_key.trim().is_empty() {
            return Err(ConfigError::invalid("session_key", "must not be empty"));
        }
        if self.format.trim().is_empty() {
            return Err(ConfigError::invalid("format", "must not be empty"));
        }
        Ok(())
    }

    /// Absolute URL of the mutation endpoint.
    pub fn endpoint_url(&self) -> Result<String, ConfigError> {
        let mut root = url::Url::parse(&self.www_root)
            .map_err(|e| ConfigError::invalid("www_root", e.to_string()))?;
        // Keep any path prefix the site lives under.
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        root.join(self.ajax_url.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| ConfigError::invalid("ajax_url", e.to_string()))
    }

    pub fn busy_hide_delay(&self) -> Duration {
        Duration::from_millis(self.busy_hide_delay_ms)
    }

    pub fn focus_restore_delay(&self) -> Duration {
        Duration::from_millis(self.focus_restore_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Values injected into every request.
    pub fn session(&self) -> SessionContext {
        SessionContext {
            session_key: self.session_key.clone(),
            course_id: self.course_id.to_string(),
            page_params: self
                .page_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Builder for [`ToolboxConfig`].
#[derive(Clone, Debug)]
pub struct ToolboxConfigBuilder {
    config: ToolboxConfig,
}

impl ToolboxConfigBuilder {
    pub fn ajax_url(mut self, path: impl Into<String>) -> Self {
        self.config.ajax_url = path.into();
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.config.format = format.into();
        self
    }

    /// Add one page-scoped parameter.
    pub fn page_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.page_params.insert(key.into(), value.into());
        self
    }

    pub fn busy_hide_delay(mut self, delay: Duration) -> Self {
        self.config.busy_hide_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn focus_restore_delay(mut self, delay: Duration) -> Self {
        self.config.focus_restore_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ToolboxConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
