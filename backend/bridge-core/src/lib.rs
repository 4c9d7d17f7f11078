pub mod bridge;
pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod exchange;
pub mod host;

#[cfg(test)]
mod tests;

pub use bridge::{Bridge, LaunchOptions, LaunchResult, LaunchState, log_launch_result};
pub use channel::{EventChannel, EventListener, ListenerId};
pub use config::BridgeConfig;
pub use context::diagnostics::Diagnostics;
pub use context::{RequestContext, SharedRequestContext};
pub use error::{BridgeError, ConfigError, CoreError, LaunchError};
pub use host::{ContentHost, HostTask, InterceptDecision, InterceptedRequest, RequestInterceptor};

pub const USERS_SCOPE: &str = "users";
/// Authentication endpoint, relative to the configured base URL.
pub const VERIFY_TOKEN_PATH: &str = const_format::concatcp!(USERS_SCOPE, "/verify_token");
