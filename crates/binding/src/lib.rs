//! Contract bindings for all external contracts.
//!
//! This crate consolidates the Solidity interfaces the bridge client talks to:
//! - Across Protocol (SpokePool, MulticallHandler instructions)
//! - ERC20 tokens
//! - Yearn V3 vaults
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod across;
pub mod token;
pub mod vault;
