use launcher::error::LauncherError;
use launcher::logger::{DEFAULT_LOG_LEVEL, initialize as LoggerInitialize, parse_level};
use launcher::paths::detect_paths;
use launcher::report::LaunchReport;
use launcher::session::{prepare, run_session};
use launcher::settings::{LOG_LEVEL_VAR, load_dotenv};

use bridge_core::LaunchState;
use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_path = load_dotenv();
    let paths = detect_paths();

    let level = match std::env::var(LOG_LEVEL_VAR) {
        Ok(raw) => parse_level(&raw).unwrap_or_else(|e| {
            eprintln!("{e}");
            DEFAULT_LOG_LEVEL
        }),
        Err(_) => DEFAULT_LOG_LEVEL,
    };

    // Ensure log directory exists, then initialize logger FIRST
    let logger = create_dir_all(&paths.log_dir)
        .map_err(|e| LauncherError::Launcher {
            message: format!("Failed to create log directory: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
        .and_then(|()| LoggerInitialize(&paths.log_dir, level));
    if let Err(e) = logger {
        eprintln!("{e}");
    }

    info!("Content launcher starting");
    info!("Config directory: {}", paths.config_dir.display());
    info!("Log directory: {}", paths.log_dir.display());
    if let Some(path) = dotenv_path {
        info!("Environment loaded from {}", path.display());
    }

    let report = match prepare(&paths) {
        Ok((config, settings)) => run_session(config, settings).await,
        Err(e) => LaunchReport::failed(LaunchState::Idle, e),
    };

    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => error!("{e}"),
    }

    if report.is_success() {
        info!("Launch succeeded");
        ExitCode::SUCCESS
    } else {
        error!("Launch did not reach a loaded session page");
        ExitCode::FAILURE
    }
}
