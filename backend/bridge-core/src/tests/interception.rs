use crate::context::diagnostics::Diagnostics;
use crate::context::interception::{augment, interceptor, is_body_bearing};
use crate::context::{RequestContext, SharedRequestContext};
use crate::host::{InterceptDecision, InterceptedRequest};

use models::HeaderSet;

use url::Url;

fn context_with(headers: HeaderSet) -> SharedRequestContext {
    let context = SharedRequestContext::new();
    context.reset(RequestContext {
        headers,
        ..RequestContext::default()
    });
    context
}

/// **VALUE**: Verifies GET sub-resources get the session headers, session values winning.
///
/// **WHY THIS MATTERS**: Session headers are how the backend ties sub-resource
/// requests to the launch. If the content's own value won, a stale header set by
/// the page would override the host's.
///
/// **BUG THIS CATCHES**: Would catch the merge direction being reversed or the
/// request's own headers being dropped.
#[test]
fn given_get_request_when_augmented_then_session_headers_win() {
    // GIVEN: Session headers and a request that already sets one of them
    let context = context_with(HeaderSet::from([("X-Trace", "session"), ("X-Tenant", "acme")]));
    let url = Url::parse("https://content.example.com/assets/app.js").unwrap();
    let request_headers = HeaderSet::from([("x-trace", "page"), ("Accept", "*/*")]);
    let request = InterceptedRequest {
        method: "GET",
        url: &url,
        headers: &request_headers,
    };

    // WHEN: Augmenting
    let decision = augment(&context, &request);

    // THEN: Merged set, session values on collision
    let InterceptDecision::Augment(headers) = decision else {
        panic!("Expected augment, got {:?}", decision);
    };
    assert_eq!(headers.get("X-Trace"), Some("session"));
    assert_eq!(headers.get("x-tenant"), Some("acme"));
    assert_eq!(headers.get("accept"), Some("*/*"));
    assert_eq!(headers.len(), 3);
}

/// **VALUE**: Verifies body-bearing requests are never rebuilt.
///
/// **WHY THIS MATTERS**: Re-issuing an intercepted POST drops its body, turning a
/// form submission into an empty request.
///
/// **BUG THIS CATCHES**: Would catch case-sensitive method checks letting `post`
/// through.
#[test]
fn given_body_bearing_methods_when_intercepted_then_passthrough() {
    let context = context_with(HeaderSet::from([("X-Trace", "session")]));
    let url = Url::parse("https://content.example.com/api").unwrap();
    let empty = HeaderSet::new();

    for method in ["POST", "put", "Patch"] {
        let request = InterceptedRequest {
            method,
            url: &url,
            headers: &empty,
        };
        assert_eq!(augment(&context, &request), InterceptDecision::Passthrough, "{method}");
    }

    assert!(!is_body_bearing("GET"));
    assert!(!is_body_bearing("DELETE"));
}

#[test]
fn given_no_session_headers_when_intercepted_then_passthrough() {
    let context = SharedRequestContext::new();
    let url = Url::parse("https://content.example.com/").unwrap();
    let empty = HeaderSet::new();

    let decision = augment(
        &context,
        &InterceptedRequest {
            method: "GET",
            url: &url,
            headers: &empty,
        },
    );

    assert_eq!(decision, InterceptDecision::Passthrough);
}

#[test]
fn given_non_http_scheme_when_intercepted_then_passthrough() {
    let context = context_with(HeaderSet::from([("X-Trace", "session")]));
    let url = Url::parse("data:text/plain,hello").unwrap();
    let empty = HeaderSet::new();

    let decision = augment(
        &context,
        &InterceptedRequest {
            method: "GET",
            url: &url,
            headers: &empty,
        },
    );

    assert_eq!(decision, InterceptDecision::Passthrough);
}

/// **VALUE**: Verifies the installed interceptor observes later header updates.
///
/// **BUG THIS CATCHES**: Would catch the interceptor capturing a copy of the
/// headers at install time instead of the shared context.
#[test]
fn given_installed_interceptor_when_headers_replaced_then_new_headers_used() {
    // GIVEN: An interceptor bound to a context
    let context = context_with(HeaderSet::from([("X-Old", "1")]));
    let intercept = interceptor(context.clone(), Diagnostics::default());
    let url = Url::parse("https://content.example.com/page").unwrap();
    let empty = HeaderSet::new();
    let request = InterceptedRequest {
        method: "GET",
        url: &url,
        headers: &empty,
    };

    // WHEN: Headers are replaced after installation
    context.set_headers(HeaderSet::from([("X-New", "2")]));

    // THEN: Only the new set is applied
    assert_eq!(
        intercept(&request),
        InterceptDecision::Augment(HeaderSet::from([("X-New", "2")]))
    );
}
