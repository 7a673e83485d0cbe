//! Deposit tracking for the bridge-and-deposit flow.
//!
//! Reports which deposits an account made on the origin chain have not been
//! filled on the destination chain yet. Deposits and fills are correlated by
//! `(originChainId, depositId)`.

pub mod pending;

pub use pending::{DepositTracker, PendingDeposit};
