//! Caller-supplied interceptors for content requests the bridge re-sends.
//!
//! When session headers are set, GET sub-resource requests are re-issued
//! with those headers. [`Diagnostics`] interceptors run on each of those
//! re-issued requests, after the session headers were merged in, and may
//! inspect or rewrite the final header set. Requests passed through
//! untouched never reach them.

use crate::host::{InterceptDecision, InterceptedRequest, RequestInterceptor};

use std::fmt;
use std::sync::Arc;

use log::trace;

#[derive(Clone, Default)]
pub struct Diagnostics {
    interceptors: Vec<RequestInterceptor>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `interceptor`. Interceptors run in the order they were added.
    pub fn with_interceptor(mut self, interceptor: RequestInterceptor) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run the interceptors over a request the bridge decided to re-send.
    ///
    /// Each interceptor sees the headers left by the previous one.
    /// `Augment` replaces them, `Passthrough` keeps them. A `Passthrough`
    /// decision from the bridge is returned unchanged.
    pub fn apply(&self, request: &InterceptedRequest<'_>, decision: InterceptDecision) -> InterceptDecision {
        let InterceptDecision::Augment(mut headers) = decision else {
            return decision;
        };

        for interceptor in &self.interceptors {
            let next = interceptor(&InterceptedRequest {
                method: request.method,
                url: request.url,
                headers: &headers,
            });
            if let InterceptDecision::Augment(rewritten) = next {
                headers = rewritten;
            }
        }

        if !self.interceptors.is_empty() {
            trace!(
                "Ran {} diagnostic interceptor(s) on {} {}",
                self.interceptors.len(),
                request.method,
                request.url
            );
        }

        InterceptDecision::Augment(headers)
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

/// Equal when both hold the same interceptor instances in the same order.
impl PartialEq for Diagnostics {
    fn eq(&self, other: &Self) -> bool {
        self.interceptors.len() == other.interceptors.len()
            && self
                .interceptors
                .iter()
                .zip(&other.interceptors)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl Eq for Diagnostics {}

