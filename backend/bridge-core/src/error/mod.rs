pub mod bridge;
pub mod config;
pub mod launch;

pub use bridge::BridgeError;
pub use config::ConfigError;
pub use launch::LaunchError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] models::ModelError),
}
