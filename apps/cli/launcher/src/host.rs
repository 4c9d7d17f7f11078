//! Content host without a rendering surface.
//!
//! [`HeadlessHost`] fetches documents over HTTP instead of rendering them. It
//! proves that a launch yields a reachable session page, which is what the
//! launcher reports on. Scripts are counted and discarded.

use crate::error::LauncherError;

use bridge_core::{ContentHost, InterceptDecision, InterceptedRequest, RequestInterceptor};
use common::ErrorLocation;
use models::HeaderSet;

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use url::Url;

/// Navigation progress reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    LoadStarted(Url),
    Loaded { url: Url, status: u16 },
    LoadFailed { url: Url, reason: String },
}

pub struct HeadlessHost {
    client: Client,
    runtime: Handle,
    history: Mutex<Vec<Url>>,
    interceptor: Mutex<Option<RequestInterceptor>>,
    events: UnboundedSender<PageEvent>,
    scripts_evaluated: AtomicUsize,
}

impl HeadlessHost {
    /// Create a host fetching on `runtime`, with the receiver for its page events.
    pub fn new(
        runtime: Handle,
        timeout: Duration,
    ) -> Result<(Arc<Self>, UnboundedReceiver<PageEvent>), LauncherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LauncherError::Launcher {
                message: format!("Failed to build HTTP client: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (events, receiver) = unbounded_channel();
        let host = Arc::new(Self {
            client,
            runtime,
            history: Mutex::new(Vec::new()),
            interceptor: Mutex::new(None),
            events,
            scripts_evaluated: AtomicUsize::new(0),
        });

        Ok((host, receiver))
    }

    pub fn current_url(&self) -> Option<Url> {
        self.lock_history().last().cloned()
    }

    pub fn scripts_evaluated(&self) -> usize {
        self.scripts_evaluated.load(Ordering::SeqCst)
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, Vec<Url>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Headers for a navigation the content initiated itself.
    fn intercepted_headers(&self, url: &Url) -> HeaderSet {
        let interceptor = self
            .interceptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let Some(intercept) = interceptor else {
            return HeaderSet::new();
        };

        let request_headers = HeaderSet::new();
        match intercept(&InterceptedRequest {
            method: "GET",
            url,
            headers: &request_headers,
        }) {
            InterceptDecision::Augment(headers) => headers,
            InterceptDecision::Passthrough => request_headers,
        }
    }

    fn emit(&self, event: PageEvent) {
        if self.events.send(event).is_err() {
            debug!("Page event receiver dropped");
        }
    }

    fn fetch(&self, url: Url, headers: HeaderSet) {
        self.emit(PageEvent::LoadStarted(url.clone()));

        let request = self.client.get(url.clone()).headers(header_map(&headers));
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let event = match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    info!("Fetched {} with HTTP {}", url.path(), status);
                    PageEvent::Loaded { url, status }
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}", url.path(), e);
                    PageEvent::LoadFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            };
            let _ = events.send(event);
        });
    }
}

fn header_map(headers: &HeaderSet) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers.iter() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!("Skipping invalid header '{}'", name),
        }
    }
    map
}

impl ContentHost for HeadlessHost {
    fn load(&self, url: &Url, headers: &HeaderSet) {
        self.lock_history().push(url.clone());
        self.fetch(url.clone(), headers.clone());
    }

    fn evaluate_script(&self, source: &str) {
        self.scripts_evaluated.fetch_add(1, Ordering::SeqCst);
        debug!("No script engine, discarding {} byte script", source.len());
    }

    fn intercept_requests(&self, interceptor: RequestInterceptor) {
        *self
            .interceptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(interceptor);
    }

    fn can_go_back(&self) -> bool {
        self.lock_history().len() > 1
    }

    fn go_back(&self) {
        let previous = {
            let mut history = self.lock_history();
            if history.len() < 2 {
                return;
            }
            history.pop();
            history.last().cloned()
        };

        if let Some(url) = previous {
            let headers = self.intercepted_headers(&url);
            self.fetch(url, headers);
        }
    }
}
