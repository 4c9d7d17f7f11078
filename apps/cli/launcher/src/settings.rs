//! Per-run launch inputs read from the environment.
//!
//! | Variable          | Meaning                                     |
//! |-------------------|---------------------------------------------|
//! | `BRIDGE_ID_TOKEN` | Bearer token to exchange (required)         |
//! | `BRIDGE_LOCATION` | Page to open after authenticating           |
//! | `BRIDGE_LOCALE`   | Language tag, `_` or `-` separated          |
//! | `BRIDGE_TIMEZONE` | IANA timezone name                          |
//! | `BRIDGE_THEME`    | Theme name passed through to the content    |
//! | `BRIDGE_HEADERS`  | JSON object of extra request headers        |
//!
//! Empty values count as unset.

use crate::error::LauncherError;

use bridge_core::LaunchOptions;
use common::Credentials;
use models::{HeaderSet, LaunchConfig, Locale};

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{info, warn};

pub const ID_TOKEN_VAR: &str = "BRIDGE_ID_TOKEN";
pub const LOCATION_VAR: &str = "BRIDGE_LOCATION";
pub const LOCALE_VAR: &str = "BRIDGE_LOCALE";
pub const TIMEZONE_VAR: &str = "BRIDGE_TIMEZONE";
pub const THEME_VAR: &str = "BRIDGE_THEME";
pub const HEADERS_VAR: &str = "BRIDGE_HEADERS";
pub const LOG_LEVEL_VAR: &str = "BRIDGE_LOG";

#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub credentials: Credentials,
    pub options: LaunchOptions,
}

impl LaunchSettings {
    pub fn from_env() -> Result<Self, LauncherError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings using `lookup` for environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Environment`] if the token is missing, the
    /// locale does not parse, or the headers are not a JSON object of strings.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LauncherError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = get(ID_TOKEN_VAR)
            .ok_or_else(|| LauncherError::environment(format!("{ID_TOKEN_VAR} is not set")))?;

        let mut launch_config = LaunchConfig::default();
        if let Some(raw) = get(LOCALE_VAR) {
            let locale = Locale::parse(&raw)
                .map_err(|e| LauncherError::environment(format!("{LOCALE_VAR}: {e}")))?;
            launch_config = launch_config.with_locale(locale);
        }
        if let Some(timezone) = get(TIMEZONE_VAR) {
            launch_config = launch_config.with_timezone(timezone);
        }
        if let Some(theme) = get(THEME_VAR) {
            launch_config = launch_config.with_theme(theme);
        }

        let headers = match get(HEADERS_VAR) {
            Some(raw) => parse_headers(&raw)?,
            None => HeaderSet::new(),
        };

        let mut options = LaunchOptions::default()
            .with_launch_config(launch_config)
            .with_headers(headers);
        if let Some(location) = get(LOCATION_VAR) {
            options = options.with_location(location);
        }

        Ok(Self {
            credentials: Credentials::new(token),
            options,
        })
    }
}

#[track_caller]
fn parse_headers(raw: &str) -> Result<HeaderSet, LauncherError> {
    let map: BTreeMap<String, String> = serde_json::from_str(raw).map_err(|e| {
        LauncherError::environment(format!("{HEADERS_VAR} must be a JSON object of strings: {e}"))
    })?;
    Ok(map.into_iter().collect())
}

/// Load `.env` from the working directory, then next to the executable.
///
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            None
        }
    }
}
