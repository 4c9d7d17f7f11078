//! Where the launcher finds its config and writes its logs.
//!
//! # Platform Behavior
//! - **Linux**: `$XDG_CONFIG_HOME/content-bridge`, logs under `$XDG_DATA_HOME/content-bridge/logs`
//! - **macOS**: `~/Library/Application Support/content-bridge`
//! - **Windows**: `%APPDATA%\content-bridge`, logs under `%LOCALAPPDATA%`

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

/// Overrides both directories; logs go to `<dir>/logs`.
pub const CONFIG_DIR_VAR: &str = "BRIDGE_CONFIG_DIR";

const APP_DIR_NAME: &str = "content-bridge";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    EnvVar,
    PlatformDefault,
    TempFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherPaths {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
    pub source: PathSource,
}

/// Resolve paths from the process environment.
pub fn detect_paths() -> LauncherPaths {
    detect_paths_with(|name| env::var(name).ok())
}

/// Resolve paths using `lookup` for environment variables.
pub fn detect_paths_with(lookup: impl Fn(&str) -> Option<String>) -> LauncherPaths {
    // 1. Environment variable override
    if let Some(custom_dir) = lookup(CONFIG_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
        let config_dir = PathBuf::from(custom_dir);
        info!("Using {} override: {:?}", CONFIG_DIR_VAR, config_dir);

        return LauncherPaths {
            log_dir: config_dir.join(LOG_DIR_NAME),
            config_dir,
            source: PathSource::EnvVar,
        };
    }

    // 2. Platform-specific detection via dirs crate
    if let Some(config_root) = dirs::config_dir() {
        let config_dir = config_root.join(APP_DIR_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|data| data.join(APP_DIR_NAME))
            .unwrap_or_else(|| config_dir.clone())
            .join(LOG_DIR_NAME);

        debug!("Platform config dir: {:?}", config_dir);

        return LauncherPaths {
            config_dir,
            log_dir,
            source: PathSource::PlatformDefault,
        };
    }

    // 3. No home directory (containers, service accounts)
    let fallback = env::temp_dir().join(APP_DIR_NAME);
    warn!("No platform config dir, using {:?}", fallback);

    LauncherPaths {
        log_dir: fallback.join(LOG_DIR_NAME),
        config_dir: fallback,
        source: PathSource::TempFallback,
    }
}
