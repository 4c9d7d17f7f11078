//! Header augmentation for intercepted requests.
//!
//! A request rebuilt from an interception callback loses its body, so only
//! methods without one are rewritten here. Body-bearing requests get the same
//! headers from the script installed by [`instrumentation`](super::instrumentation).

use crate::context::SharedRequestContext;
use crate::context::diagnostics::Diagnostics;
use crate::host::{InterceptDecision, InterceptedRequest, RequestInterceptor};

use std::sync::Arc;

use log::trace;

const BODY_BEARING_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

pub fn is_body_bearing(method: &str) -> bool {
    BODY_BEARING_METHODS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(method))
}

/// Decide how to rewrite `request` given the current context headers.
///
/// Context headers win over headers the content set itself.
pub fn augment(context: &SharedRequestContext, request: &InterceptedRequest<'_>) -> InterceptDecision {
    if is_body_bearing(request.method) {
        trace!("Passing through {} {} (body-bearing)", request.method, request.url);
        return InterceptDecision::Passthrough;
    }

    if !matches!(request.url.scheme(), "http" | "https") {
        return InterceptDecision::Passthrough;
    }

    let session_headers = context.headers();
    if session_headers.is_empty() {
        return InterceptDecision::Passthrough;
    }

    let mut headers = request.headers.clone();
    headers.merge(&session_headers);
    trace!(
        "Augmenting {} {} with {} session header(s)",
        request.method,
        request.url,
        session_headers.len()
    );
    InterceptDecision::Augment(headers)
}

/// Interceptor bound to `context`, ready to install on a content host.
///
/// `diagnostics` runs after the session headers are merged in.
pub fn interceptor(context: SharedRequestContext, diagnostics: Diagnostics) -> RequestInterceptor {
    Arc::new(move |request: &InterceptedRequest<'_>| {
        diagnostics.apply(request, augment(&context, request))
    })
}
