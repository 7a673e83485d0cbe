//! Configuration types for the bridge-and-deposit client.
//!
//! This crate provides:
//! - Origin / destination chain configurations keyed by chain id
//! - The catalogue of destination vaults
//! - Validation

pub mod network;

use thiserror::Error;

pub use network::{
    DestinationChainConfig, NetworkConfig, NetworkConfigBuilder, OriginChainConfig, VaultConfig,
    ACROSS_API_URL, FILL_DEADLINE_BUFFER_SECS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No built-in configuration exists for the chain
    #[error("Unsupported origin chain id: {0}")]
    UnsupportedChain(u64),

    /// A required address is zero
    #[error("Address must not be zero: {0}")]
    ZeroAddress(&'static str),

    /// Origin and destination point at the same chain
    #[error("Origin and destination chain are both {0}")]
    SameChain(u64),

    /// The vault catalogue is empty
    #[error("No vaults configured")]
    NoVaults,
}
