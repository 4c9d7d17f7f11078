//! Bridge configuration.
//!
//! One explicit [`BridgeConfig`] value is handed to [`Bridge::new`](crate::Bridge::new);
//! there is no process-wide instance.

use crate::context::diagnostics::Diagnostics;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "bridge.json";
const CONFIG_VERSION: u32 = 1;
const DEFAULT_SCRIPT_NAMESPACE: &str = "contentBridge";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const SCRIPT_NAMESPACE_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*$";

static SCRIPT_NAMESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_script_namespace_regex() -> &'static Regex {
    SCRIPT_NAMESPACE_REGEX
        .get_or_init(|| Regex::new(SCRIPT_NAMESPACE_PATTERN).expect("valid regex pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Client id sent as `client_id` in the authentication body.
    pub client_id: String,

    /// Root of the content deployment; `users/verify_token` is resolved against it.
    pub base_url: String,

    /// Global object on the content's `window` that receives commands.
    #[serde(default = "default_script_namespace")]
    pub script_namespace: String,

    /// Timeout of the HTTP client used for the authentication call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interceptors for re-sent content requests. Code-only, never persisted.
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_script_namespace() -> String {
    DEFAULT_SCRIPT_NAMESPACE.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

// ============================================
// IMPLEMENTATION
// ============================================

impl BridgeConfig {
    pub fn new(client_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            version: CONFIG_VERSION,
            client_id: client_id.into(),
            base_url: base_url.into(),
            script_namespace: default_script_namespace(),
            request_timeout_secs: default_request_timeout_secs(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_script_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.script_namespace = namespace.into();
        self
    }

    /// Set the authentication timeout, rounded up to whole seconds.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let whole_secs = timeout.as_secs();
        self.request_timeout_secs = if timeout.subsec_nanos() > 0 {
            whole_secs.saturating_add(1)
        } else {
            whole_secs
        };
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed [`BridgeConfig::base_url`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the URL does not parse, is not
    /// http(s), or cannot serve as a base for relative paths.
    #[track_caller]
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid base_url '{}': {}", self.base_url, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("base_url must be an http(s) URL: {}", self.base_url),
            });
        }

        Ok(url)
    }

    /// Load config from {config_dir}/bridge.json.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file is missing (there is no usable
    /// default client id), or a read/parse/validation error if it is corrupted.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            warn!("Bridge config not found at {}", config_path.display());
            return Err(ConfigError::NotFound {
                location: ErrorLocation::from(Location::caller()),
                path: config_path,
            });
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        let config: BridgeConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse bridge config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Bridge config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/bridge.json using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Bridge config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.client_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "client_id cannot be empty".to_string(),
            });
        }

        self.parsed_base_url()?;

        if !get_script_namespace_regex().is_match(&self.script_namespace) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "script_namespace is not a JavaScript identifier: {}",
                    self.script_namespace
                ),
            });
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid request_timeout_secs: {} (must be 1-{})",
                    self.request_timeout_secs, MAX_REQUEST_TIMEOUT_SECS
                ),
            });
        }

        Ok(())
    }
}
