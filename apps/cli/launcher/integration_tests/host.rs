use launcher::host::{HeadlessHost, PageEvent};

use bridge_core::{ContentHost, InterceptDecision, InterceptedRequest};
use models::HeaderSet;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies a load sends the given headers and reports the page status.
///
/// **WHY THIS MATTERS**: The launcher's verdict is built from this event. If the
/// headers were dropped, the backend would serve the page anonymously and the
/// launcher would still report success.
///
/// **BUG THIS CATCHES**: Would catch headers being skipped on the main document,
/// or LoadStarted not being emitted before the fetch.
#[tokio::test]
async fn given_load_when_page_served_then_headers_sent_and_status_reported() {
    // GIVEN: A page that requires the session header
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/abc"))
        .and(header("X-Session-Tag", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;
    let (host, mut events) = HeadlessHost::new(Handle::current(), Duration::from_secs(5)).unwrap();
    let url = Url::parse(&format!("{}/session/abc", server.uri())).unwrap();

    // WHEN: Loading it
    host.load(&url, &HeaderSet::from([("X-Session-Tag", "abc")]));

    // THEN: LoadStarted then Loaded(200)
    assert_eq!(events.recv().await, Some(PageEvent::LoadStarted(url.clone())));
    assert_eq!(
        events.recv().await,
        Some(PageEvent::Loaded {
            url: url.clone(),
            status: 200
        })
    );
    assert_eq!(host.current_url(), Some(url));
}

#[tokio::test]
async fn given_unreachable_page_when_loading_then_load_failed() {
    let (host, mut events) = HeadlessHost::new(Handle::current(), Duration::from_secs(5)).unwrap();
    let url = Url::parse("http://127.0.0.1:9/session").unwrap();

    host.load(&url, &HeaderSet::new());

    assert_eq!(events.recv().await, Some(PageEvent::LoadStarted(url.clone())));
    assert!(matches!(events.recv().await, Some(PageEvent::LoadFailed { .. })));
}

/// **VALUE**: Verifies back navigation refetches the previous page through the interceptor.
///
/// **BUG THIS CATCHES**: Would catch history being popped without a refetch, or
/// the content-initiated navigation skipping session headers.
#[tokio::test]
async fn given_two_loads_when_going_back_then_previous_page_refetched_with_intercepted_headers() {
    // GIVEN: Two pages loaded and an interceptor adding a header
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let (host, mut events) = HeadlessHost::new(Handle::current(), Duration::from_secs(5)).unwrap();
    host.intercept_requests(Arc::new(|_: &InterceptedRequest<'_>| {
        InterceptDecision::Augment(HeaderSet::from([("X-Back", "1")]))
    }));
    let first = Url::parse(&format!("{}/first", server.uri())).unwrap();
    let second = Url::parse(&format!("{}/second", server.uri())).unwrap();
    assert!(!host.can_go_back());
    host.load(&first, &HeaderSet::new());
    host.load(&second, &HeaderSet::new());
    for _ in 0..4 {
        events.recv().await;
    }

    // WHEN: Going back
    assert!(host.can_go_back());
    host.go_back();

    // THEN: The first page is fetched again with the intercepted header
    assert_eq!(events.recv().await, Some(PageEvent::LoadStarted(first.clone())));
    assert!(matches!(events.recv().await, Some(PageEvent::Loaded { status: 200, .. })));
    assert_eq!(host.current_url(), Some(first));
    assert!(!host.can_go_back());

    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.url.path(), "/first");
    assert_eq!(last.headers.get("x-back").unwrap(), "1");
}

#[tokio::test]
async fn given_scripts_when_evaluated_then_counted() {
    let (host, _events) = HeadlessHost::new(Handle::current(), Duration::from_secs(5)).unwrap();

    host.evaluate_script("window.a = 1;");
    host.evaluate_script("window.b = 2;");

    assert_eq!(host.scripts_evaluated(), 2);
}
