pub mod allowance;
pub mod amount;
pub mod approve;
pub mod deposit;
pub mod message;

use alloy_primitives::{Address, TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
pub use client::TxConfirmation;
use client::WalletError;
use quote::QuoteError;
use std::future::Future;
use thiserror::Error;

pub use allowance::{check_allowance, read_allowance, read_balance};
pub use amount::{format_amount, parse_amount};
pub use approve::ApproveAction;
pub use deposit::{BridgeDepositAction, DepositParams};
pub use message::{decode_message, MulticallMessageBuilder};

/// Errors surfaced by the bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid deposit parameters: {0}")]
    InvalidParams(String),

    /// The relay fee would consume the whole deposit
    #[error("Relay fee {fee} leaves nothing of input amount {amount}")]
    FeeExceedsAmount { amount: U256, fee: U256 },

    #[error("Insufficient funds: balance {available} is below {required}")]
    InsufficientFunds { required: U256, available: U256 },

    #[error("Failed to decode {0}")]
    Decode(String),

    #[error("System clock error: {0}")]
    Clock(String),
}

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = Result<bool, BridgeError>> + Send;

    /// Execute the action.
    ///
    /// Returns once the transaction has one confirmation.
    fn execute(&mut self) -> impl Future<Output = Result<TxConfirmation, BridgeError>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// A transaction request calling `to` with `data`.
pub(crate) fn call_request(to: Address, data: Vec<u8>) -> TransactionRequest {
    TransactionRequest {
        to: Some(TxKind::Call(to)),
        input: TransactionInput::new(data.into()),
        ..Default::default()
    }
}
