//! One launch, from loaded config to a fetched session page.

use crate::error::LauncherError;
use crate::host::{HeadlessHost, PageEvent};
use crate::paths::LauncherPaths;
use crate::report::LaunchReport;
use crate::settings::LaunchSettings;

use bridge_core::{Bridge, BridgeConfig, LaunchState};
use common::ErrorLocation;
use models::Event;

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tokio::time::timeout;

/// Load the bridge config from `paths` and the launch settings from the environment.
pub fn prepare(paths: &LauncherPaths) -> Result<(BridgeConfig, LaunchSettings), LauncherError> {
    let config = BridgeConfig::load(&paths.config_dir).map_err(LauncherError::core)?;
    let settings = LaunchSettings::from_env()?;
    Ok((config, settings))
}

/// Launch against `config` and wait for the session page to be fetched.
///
/// Never fails: every error ends up in the returned report.
pub async fn run_session(config: BridgeConfig, settings: LaunchSettings) -> LaunchReport {
    let page_timeout = config.request_timeout();

    let (host, mut pages) = match HeadlessHost::new(Handle::current(), page_timeout) {
        Ok(created) => created,
        Err(e) => return LaunchReport::failed(LaunchState::Idle, e),
    };

    let bridge = match Bridge::new(config, host.clone()) {
        Ok(bridge) => bridge,
        Err(e) => return LaunchReport::failed(LaunchState::Idle, LauncherError::core(e)),
    };
    bridge.register_listener(Arc::new(log_event));

    let (completion_tx, completion_rx) = oneshot::channel();
    bridge.launch(settings.credentials, settings.options, move |result| {
        let _ = completion_tx.send(result);
    });

    match completion_rx.await {
        Ok(Ok(())) => info!("Session handed to host"),
        Ok(Err(e)) => return LaunchReport::failed(bridge.state(), LauncherError::core(e)),
        Err(_) => {
            return LaunchReport::failed(
                bridge.state(),
                LauncherError::Launcher {
                    message: "Launch completion was dropped".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
            );
        }
    }

    let outcome = timeout(page_timeout, wait_for_page(&bridge, &mut pages)).await;
    let state = bridge.state();
    let session_url = bridge.request_context().session_url;
    match outcome {
        Ok(Ok(status)) => LaunchReport::loaded(state, session_url.as_ref(), status),
        Ok(Err(reason)) => LaunchReport::failed(
            state,
            LauncherError::Load {
                message: reason,
                location: ErrorLocation::from(Location::caller()),
            },
        ),
        Err(_) => LaunchReport::failed(
            state,
            LauncherError::Load {
                message: format!("Session page not fetched within {page_timeout:?}"),
                location: ErrorLocation::from(Location::caller()),
            },
        ),
    }
}

async fn wait_for_page(bridge: &Bridge, pages: &mut UnboundedReceiver<PageEvent>) -> Result<u16, String> {
    while let Some(event) = pages.recv().await {
        match event {
            PageEvent::LoadStarted(url) => bridge.on_load_started(&url),
            PageEvent::Loaded { status, .. } => return Ok(status),
            PageEvent::LoadFailed { reason, .. } => return Err(reason),
        }
    }

    Err("Host stopped reporting page events".to_string())
}

fn log_event(event: &Event) {
    match event.request_id() {
        Some(request_id) => warn!(
            "Content sent {} (request {}), which a headless host cannot answer",
            event.kind(),
            request_id
        ),
        None => debug!("Content sent {}", event.kind()),
    }
}
