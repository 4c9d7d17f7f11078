//! Test helpers for bridge integration tests.
//!
//! - A recording content host standing in for a real webview
//! - A mock authentication endpoint
//! - Launch helpers that wait for the completion callback

use bridge_core::{
    Bridge, BridgeConfig, ContentHost, HostTask, InterceptDecision, InterceptedRequest,
    LaunchOptions, LaunchResult, RequestInterceptor,
};
use common::Credentials;
use models::HeaderSet;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "sample-client";
pub const TEST_TOKEN: &str = "id-token-12345";
pub const SESSION_PATH: &str = "/session/abc";
pub const VERIFY_TOKEN_ENDPOINT: &str = "/users/verify_token";

/// Content host that records every primitive the bridge issues.
#[derive(Default)]
pub struct RecordingHost {
    loads: Mutex<Vec<(Url, HeaderSet)>>,
    scripts: Mutex<Vec<String>>,
    interceptor: Mutex<Option<RequestInterceptor>>,
    dispatched: AtomicUsize,
    has_history: AtomicBool,
    back_navigations: AtomicUsize,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn loads(&self) -> Vec<(Url, HeaderSet)> {
        self.loads.lock().unwrap().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn clear_scripts(&self) {
        self.scripts.lock().unwrap().clear();
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub fn back_navigations(&self) -> usize {
        self.back_navigations.load(Ordering::SeqCst)
    }

    pub fn set_has_history(&self, has_history: bool) {
        self.has_history.store(has_history, Ordering::SeqCst);
    }

    /// Run the installed interceptor as the webview would for a sub-resource.
    pub fn simulate_request(&self, method: &str, url: &str, headers: &HeaderSet) -> InterceptDecision {
        let url = Url::parse(url).unwrap();
        let interceptor = self
            .interceptor
            .lock()
            .unwrap()
            .clone()
            .expect("bridge should install an interceptor on creation");
        interceptor(&InterceptedRequest {
            method,
            url: &url,
            headers,
        })
    }
}

impl ContentHost for RecordingHost {
    fn load(&self, url: &Url, headers: &HeaderSet) {
        self.loads.lock().unwrap().push((url.clone(), headers.clone()));
    }

    fn evaluate_script(&self, source: &str) {
        self.scripts.lock().unwrap().push(source.to_string());
    }

    fn intercept_requests(&self, interceptor: RequestInterceptor) {
        *self.interceptor.lock().unwrap() = Some(interceptor);
    }

    fn can_go_back(&self) -> bool {
        self.has_history.load(Ordering::SeqCst)
    }

    fn go_back(&self) {
        self.back_navigations.fetch_add(1, Ordering::SeqCst);
    }

    fn dispatch(&self, task: HostTask) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        task()
    }
}

/// Mock server whose authentication endpoint redirects to [`SESSION_PATH`].
pub async fn start_auth_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", SESSION_PATH))
        .mount(&server)
        .await;
    server
}

pub fn create_bridge(server: &MockServer, host: &Arc<RecordingHost>) -> Bridge {
    let config = BridgeConfig::new(TEST_CLIENT_ID, server.uri());
    Bridge::new(config, host.clone()).expect("Failed to create bridge")
}

pub fn session_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{}", server.uri(), SESSION_PATH)).unwrap()
}

/// Launch and wait for the completion callback.
pub async fn launch_and_wait(bridge: &Bridge, options: LaunchOptions) -> LaunchResult {
    let (tx, rx) = oneshot::channel();
    bridge.launch(Credentials::new(TEST_TOKEN), options, move |result| {
        let _ = tx.send(result);
    });
    rx.await.expect("completion callback was dropped")
}

/// Bridge that has completed a successful launch with `headers`.
pub async fn launched_bridge(
    server: &MockServer,
    host: &Arc<RecordingHost>,
    headers: HeaderSet,
) -> Bridge {
    let bridge = create_bridge(server, host);
    launch_and_wait(&bridge, LaunchOptions::default().with_headers(headers))
        .await
        .expect("Launch should succeed");
    bridge
}

/// JSON payload of a command delivery script.
pub fn command_payload(script: &str) -> serde_json::Value {
    let marker = ".receive(";
    let start = script.rfind(marker).expect("not a command script") + marker.len();
    let end = script.rfind(");").expect("not a command script");
    serde_json::from_str(&script[start..end]).unwrap()
}

pub fn command_payloads(host: &RecordingHost) -> Vec<serde_json::Value> {
    host.scripts()
        .iter()
        .filter(|script| script.starts_with("window."))
        .map(|script| command_payload(script))
        .collect()
}
