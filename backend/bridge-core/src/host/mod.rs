//! The embedding surface, as seen by the bridge.
//!
//! The bridge never touches rendering internals. It only issues the
//! primitives below and answers interception callbacks. Implementations wrap
//! whatever webview the host application uses.
//!
//! # Threading
//!
//! [`ContentHost::dispatch`] marshals work onto the context the surface
//! requires (typically its UI thread). The bridge routes launch completion and
//! the session load through it. The interceptor may be invoked from any
//! thread, before the intercepted request is sent.

use models::HeaderSet;

use std::sync::Arc;

use url::Url;

/// Work queued onto the host's own execution context.
pub type HostTask = Box<dyn FnOnce() + Send + 'static>;

/// Callback installed on the host to rewrite outbound requests.
pub type RequestInterceptor = Arc<dyn Fn(&InterceptedRequest<'_>) -> InterceptDecision + Send + Sync>;

/// An outbound request the content is about to make.
#[derive(Debug, Clone, Copy)]
pub struct InterceptedRequest<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    pub headers: &'a HeaderSet,
}

/// What the host should do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptDecision {
    /// Send the request unchanged.
    Passthrough,
    /// Re-issue the request with exactly these headers.
    Augment(HeaderSet),
}

pub trait ContentHost: Send + Sync {
    /// Navigate the main document to `url`, sending `headers` with the GET.
    fn load(&self, url: &Url, headers: &HeaderSet);

    /// Run `source` in the currently loaded page. Fire-and-forget.
    fn evaluate_script(&self, source: &str);

    /// Install the interceptor consulted before every outbound request.
    fn intercept_requests(&self, interceptor: RequestInterceptor);

    fn can_go_back(&self) -> bool;

    fn go_back(&self);

    /// Run `task` on the host's UI-affine context.
    ///
    /// The default runs it inline, which suits hosts without thread affinity.
    fn dispatch(&self, task: HostTask) {
        task()
    }
}
