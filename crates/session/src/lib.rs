//! Session controller for the bridge-and-deposit flow.
//!
//! A [`BridgeSession`] holds the transient form state of one user session
//! (account, amount, selected vault) and drives the linear
//! connect → approve → bridge flow through a single [`FlowState`].

pub mod controller;
pub mod state;

use action::BridgeError;
use config::ConfigError;
use thiserror::Error;

pub use controller::BridgeSession;
pub use state::{FlowState, Step};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("No amount entered")]
    MissingAmount,

    #[error("No vault selected")]
    MissingVault,

    #[error("Unknown vault: {0}")]
    UnknownVault(String),

    /// A previous step has not finished
    #[error("A step is already in progress ({0})")]
    Busy(FlowState),

    #[error("Bridge already complete")]
    AlreadyComplete,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
