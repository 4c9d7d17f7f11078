//! Launch state machine and the public bridge surface.
//!
//! A [`Bridge`] pairs one content host with one session:
//!
//! 1. [`Bridge::launch`] exchanges credentials for a session URL
//! 2. The request context is populated and the host loads the session URL
//! 3. The content reports `content_loaded` through [`Bridge::receive_message`]
//! 4. Host and content exchange events and commands until the next launch
//!
//! # Failure surface
//!
//! Every launch outcome, including a launch rejected because another one is
//! in flight, goes through the completion callback. Commands issued before
//! the content is loaded return [`BridgeError::NotLoaded`].

pub mod completion;
mod state;

pub use completion::{LaunchResult, log_launch_result};
pub use state::LaunchState;

use crate::channel::outbound::command_script;
use crate::channel::{EventChannel, EventListener, ListenerId};
use crate::config::BridgeConfig;
use crate::context::instrumentation::header_instrumentation_script;
use crate::context::{RequestContext, SharedRequestContext, interception};
use crate::error::{BridgeError, CoreError, LaunchError};
use crate::exchange::{AuthenticationRequest, CredentialExchange};
use crate::host::ContentHost;

use common::{Credentials, ErrorLocation};
use models::{Command, Event, HeaderSet, LaunchConfig, Locale, RequestId};

use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::runtime::Handle;
use url::Url;

/// Per-launch inputs besides the credentials.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Where the content should navigate after authenticating.
    pub location: Option<String>,
    pub launch_config: LaunchConfig,
    /// Sent with the authentication call and every later content request.
    pub headers: HeaderSet,
}

impl LaunchOptions {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_launch_config(mut self, launch_config: LaunchConfig) -> Self {
        self.launch_config = launch_config;
        self
    }

    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }
}

/// Handle to one bridge session. Clones share the same session.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    host: Arc<dyn ContentHost>,
    exchange: CredentialExchange,
    state: Mutex<LaunchState>,
    context: SharedRequestContext,
    channel: EventChannel,
    runtime: Handle,
}

impl Bridge {
    /// Create a bridge on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Bridge`] outside a runtime, [`CoreError::Config`] if
    /// the config is invalid.
    pub fn new(config: BridgeConfig, host: Arc<dyn ContentHost>) -> Result<Self, CoreError> {
        let runtime = Handle::try_current().map_err(|e| BridgeError::Runtime {
            message: format!("Bridge must be created inside a tokio runtime: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::with_runtime(config, host, runtime)
    }

    /// Create a bridge whose authentication calls run on `runtime`.
    pub fn with_runtime(
        config: BridgeConfig,
        host: Arc<dyn ContentHost>,
        runtime: Handle,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let exchange = CredentialExchange::new(&config)?;

        let context = SharedRequestContext::new();
        host.intercept_requests(interception::interceptor(
            context.clone(),
            config.diagnostics.clone(),
        ));

        info!(
            "Bridge created for client '{}' at {} ({} diagnostic interceptor(s))",
            config.client_id,
            exchange.endpoint(),
            config.diagnostics.len()
        );

        Ok(Self {
            inner: Arc::new(BridgeInner {
                config,
                host,
                exchange,
                state: Mutex::new(LaunchState::Idle),
                context,
                channel: EventChannel::new(),
                runtime,
            }),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn state(&self) -> LaunchState {
        *self.inner.lock_state()
    }

    /// Copy of the current request context.
    pub fn request_context(&self) -> RequestContext {
        self.inner.context.snapshot()
    }

    // ============================================
    // LAUNCH
    // ============================================

    /// Authenticate and load the content.
    ///
    /// Returns immediately. `on_completion` runs exactly once: synchronously
    /// if the launch is rejected (another launch in flight), otherwise through
    /// [`ContentHost::dispatch`] after the authentication call finishes.
    pub fn launch<F>(&self, credentials: Credentials, options: LaunchOptions, on_completion: F)
    where
        F: FnOnce(LaunchResult) + Send + 'static,
    {
        if let Err(e) = self.inner.begin_launch() {
            on_completion(Err(e));
            return;
        }

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            let outcome = inner.authenticate(&credentials, &options).await;
            let host = Arc::clone(&inner.host);
            host.dispatch(Box::new(move || {
                let result = inner.finish_launch(outcome, credentials, options);
                on_completion(result);
            }));
        });
    }

    /// [`Bridge::launch`] with a completion that only logs failures.
    pub fn launch_and_log(&self, credentials: Credentials, options: LaunchOptions) {
        self.launch(credentials, options, log_launch_result);
    }

    /// Authenticate and load the content, finishing on the caller's task.
    ///
    /// Unlike [`Bridge::launch`], the session load is issued from the awaiting
    /// task rather than through [`ContentHost::dispatch`].
    ///
    /// Dropping the future before it resolves abandons the launch and leaves
    /// the bridge in [`LaunchState::Failed`], so a later launch is accepted.
    pub async fn launch_async(&self, credentials: Credentials, options: LaunchOptions) -> LaunchResult {
        self.inner.begin_launch()?;
        let pending = PendingLaunch::new(&self.inner);
        let outcome = self.inner.authenticate(&credentials, &options).await;
        pending.finish(outcome, credentials, options)
    }

    // ============================================
    // CONTENT -> HOST
    // ============================================

    /// Entry point for raw messages posted by the content.
    ///
    /// Malformed messages are dropped. `content_loaded` telemetry moves a
    /// loaded bridge to [`LaunchState::Ready`] before listeners see it.
    pub fn receive_message(&self, raw: &str) -> Option<Event> {
        let event = self.inner.channel.decode(raw)?;
        if event.is_content_loaded() {
            self.inner.mark_ready();
        }
        self.inner.channel.dispatch(&event);
        Some(event)
    }

    /// Must be called by the host whenever the page starts loading.
    ///
    /// Page scripts do not survive navigation, so the header instrumentation
    /// is evaluated again on every load-start.
    pub fn on_load_started(&self, url: &Url) {
        if !self.state().is_loaded() {
            debug!("Load started for {} before a session exists, not instrumenting", url);
            return;
        }

        debug!("Load started for {}, reinstalling header instrumentation", url);
        let headers = self.inner.context.headers();
        self.inner.install_instrumentation(&headers);
    }

    pub fn register_listener(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        self.inner.channel.register(listener)
    }

    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.inner.channel.unregister(id)
    }

    // ============================================
    // HOST -> CONTENT
    // ============================================

    pub fn update_locale(&self, locale: Locale) -> Result<(), BridgeError> {
        self.inner.require_loaded("update_locale")?;
        self.inner
            .context
            .write(|context| context.locale = Some(locale.clone()));
        self.inner.send(Command::UpdateLocale { locale })
    }

    /// Record the timezone in the request context.
    ///
    /// No command is sent and nothing reloads. Interception does not read it,
    /// and the next launch replaces it with its own launch config.
    pub fn update_timezone(&self, timezone: impl Into<String>) -> Result<(), BridgeError> {
        self.inner.require_loaded("update_timezone")?;
        let timezone = timezone.into();
        self.inner
            .context
            .write(|context| context.timezone = Some(timezone));
        Ok(())
    }

    /// Record the theme in the request context. Like
    /// [`Bridge::update_timezone`], nothing is sent to the content.
    pub fn update_theme(&self, theme: impl Into<String>) -> Result<(), BridgeError> {
        self.inner.require_loaded("update_theme")?;
        let theme = theme.into();
        self.inner.context.write(|context| context.theme = Some(theme));
        Ok(())
    }

    /// Replace (not merge) the session headers.
    pub fn update_headers(&self, headers: HeaderSet) -> Result<(), BridgeError> {
        self.inner.require_loaded("update_headers")?;
        self.inner.context.set_headers(headers.clone());
        self.inner.install_instrumentation(&headers);
        self.inner.send(Command::UpdateHeaders { headers })
    }

    /// Reply to [`Event::CredentialsExpired`] with rotated credentials.
    pub fn update_credentials(
        &self,
        request_id: RequestId,
        credentials: Credentials,
    ) -> Result<(), BridgeError> {
        self.inner.require_loaded("update_credentials")?;
        self.inner
            .context
            .write(|context| context.credentials = Some(credentials.clone()));
        self.inner.send(Command::UpdateCredentials {
            request_id,
            credentials,
        })
    }

    /// Reply to [`Event::AccountProvisionRequested`].
    pub fn account_provision_initiated(&self, request_id: RequestId) -> Result<(), BridgeError> {
        self.inner.require_loaded("account_provision_initiated")?;
        self.inner
            .send(Command::AccountProvisionInitiated { request_id })
    }

    /// Reply to [`Event::AccountRequested`].
    pub fn account_request_succeeded(&self, request_id: RequestId) -> Result<(), BridgeError> {
        self.inner.require_loaded("account_request_succeeded")?;
        self.inner.send(Command::AccountRequestSucceeded { request_id })
    }

    /// Reply to [`Event::AccountRequested`].
    pub fn account_request_failed(
        &self,
        request_id: RequestId,
        reason: impl Into<String>,
    ) -> Result<(), BridgeError> {
        self.inner.require_loaded("account_request_failed")?;
        self.inner.send(Command::AccountRequestFailed {
            request_id,
            reason: reason.into(),
        })
    }

    pub fn navigate_to(&self, location: impl Into<String>) -> Result<(), BridgeError> {
        self.inner.require_loaded("navigate_to")?;
        let location = location.into();
        self.inner
            .context
            .write(|context| context.location = Some(location.clone()));
        self.inner.send(Command::NavigateTo { location })
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.host.can_go_back()
    }

    pub fn go_back(&self) {
        self.inner.host.go_back()
    }
}

/// Launch between `begin_launch` and `finish_launch` on an awaiting task.
struct PendingLaunch<'a> {
    inner: &'a BridgeInner,
    finished: bool,
}

impl<'a> PendingLaunch<'a> {
    fn new(inner: &'a BridgeInner) -> Self {
        Self {
            inner,
            finished: false,
        }
    }

    fn finish(
        mut self,
        outcome: Result<Url, LaunchError>,
        credentials: Credentials,
        options: LaunchOptions,
    ) -> LaunchResult {
        self.finished = true;
        self.inner.finish_launch(outcome, credentials, options)
    }
}

impl Drop for PendingLaunch<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.inner.abandon_launch();
        }
    }
}

impl BridgeInner {
    fn lock_state(&self) -> MutexGuard<'_, LaunchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: LaunchState) {
        let mut state = self.lock_state();
        debug!("Bridge state {} -> {}", *state, next);
        *state = next;
    }

    #[track_caller]
    fn begin_launch(&self) -> Result<(), LaunchError> {
        let mut state = self.lock_state();
        if !state.can_launch() {
            warn!("Rejecting launch while {}", *state);
            return Err(LaunchError::invalid_state(*state));
        }

        *state = LaunchState::Authenticating;
        info!("Launch started");
        Ok(())
    }

    fn abandon_launch(&self) {
        let mut state = self.lock_state();
        if *state == LaunchState::Authenticating {
            warn!("Launch abandoned before authentication finished");
            *state = LaunchState::Failed;
        }
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
        options: &LaunchOptions,
    ) -> Result<Url, LaunchError> {
        let request = AuthenticationRequest {
            credentials,
            launch_config: &options.launch_config,
            location: options.location.as_deref(),
            headers: &options.headers,
        };

        self.exchange.authenticate(&request).await
    }

    fn finish_launch(
        &self,
        outcome: Result<Url, LaunchError>,
        credentials: Credentials,
        options: LaunchOptions,
    ) -> LaunchResult {
        let session_url = match outcome {
            Ok(url) => url,
            Err(e) => {
                warn!("Launch failed ({}): {}", e.error_category(), e);
                self.set_state(LaunchState::Failed);
                return Err(e);
            }
        };

        let headers = options.headers.clone();
        self.context.reset(RequestContext::for_session(
            credentials,
            options.location,
            options.launch_config,
            options.headers,
            session_url.clone(),
        ));
        self.set_state(LaunchState::Loaded);

        info!("Loading session URL with {} header(s)", headers.len());
        self.host.load(&session_url, &headers);
        Ok(())
    }

    fn mark_ready(&self) {
        let mut state = self.lock_state();
        match *state {
            LaunchState::Loaded => {
                info!("Content reported loaded, bridge ready");
                *state = LaunchState::Ready;
            }
            LaunchState::Ready => debug!("Content reported loaded again"),
            other => warn!("Ignoring content_loaded while {}", other),
        }
    }

    #[track_caller]
    fn require_loaded(&self, operation: &'static str) -> Result<(), BridgeError> {
        let state = *self.lock_state();
        if state.is_loaded() {
            Ok(())
        } else {
            warn!("Rejecting {} while {}", operation, state);
            Err(BridgeError::not_loaded(operation, state))
        }
    }

    fn install_instrumentation(&self, headers: &HeaderSet) {
        match header_instrumentation_script(&self.config.script_namespace, headers) {
            Ok(script) => self.host.evaluate_script(&script),
            Err(e) => error!("Failed to build header instrumentation: {}", e),
        }
    }

    fn send(&self, command: Command) -> Result<(), BridgeError> {
        let script = command_script(&self.config.script_namespace, &command)?;

        match command.request_id() {
            Some(request_id) => info!("Sending {} for request {}", command.kind(), request_id),
            None => info!("Sending {}", command.kind()),
        }

        self.host.evaluate_script(&script);
        Ok(())
    }
}
