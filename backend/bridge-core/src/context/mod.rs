//! Request context shared between the state machine and the interceptor.
//!
//! # Architecture
//!
//! - The launch state machine is the only writer
//! - Interception callbacks read from other threads through the same
//!   `Arc<RwLock<_>>`, so every read observes the last completed write
//! - Locks are never held across calls into the content host

pub mod diagnostics;
pub mod instrumentation;
pub mod interception;

use common::Credentials;
use models::{HeaderSet, LaunchConfig, Locale};

use std::sync::{Arc, PoisonError, RwLock};

use url::Url;

/// Per-session state attached to requests made on behalf of the content.
///
/// Only `headers` is read back by interception and instrumentation. The
/// remaining fields record the session as last launched or updated. The client
/// id and base URL are fixed per bridge and live in [`BridgeConfig`](crate::BridgeConfig).
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub credentials: Option<Credentials>,
    pub locale: Option<Locale>,
    pub timezone: Option<String>,
    pub theme: Option<String>,
    pub location: Option<String>,
    pub headers: HeaderSet,
    pub session_url: Option<Url>,
}

impl RequestContext {
    /// Fresh context for a session that just authenticated.
    pub fn for_session(
        credentials: Credentials,
        location: Option<String>,
        launch_config: LaunchConfig,
        headers: HeaderSet,
        session_url: Url,
    ) -> Self {
        Self {
            credentials: Some(credentials),
            locale: launch_config.locale,
            timezone: launch_config.timezone,
            theme: launch_config.theme,
            location,
            headers,
            session_url: Some(session_url),
        }
    }
}

/// Cloneable handle to the session's [`RequestContext`].
#[derive(Debug, Clone, Default)]
pub struct SharedRequestContext {
    inner: Arc<RwLock<RequestContext>>,
}

impl SharedRequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current context.
    pub fn snapshot(&self) -> RequestContext {
        self.read(|context| context.clone())
    }

    pub fn headers(&self) -> HeaderSet {
        self.read(|context| context.headers.clone())
    }

    pub fn read<T>(&self, f: impl FnOnce(&RequestContext) -> T) -> T {
        // Writes are single assignments; a poisoned lock still holds a whole value.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub(crate) fn write<T>(&self, f: impl FnOnce(&mut RequestContext) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Replace the whole context (fresh launch).
    pub(crate) fn reset(&self, context: RequestContext) {
        self.write(|current| *current = context);
    }

    /// Replace the header set. Full overwrite, so stale headers disappear.
    pub(crate) fn set_headers(&self, headers: HeaderSet) {
        self.write(|context| context.headers = headers);
    }
}
