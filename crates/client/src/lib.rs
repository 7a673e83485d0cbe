//! Wallet capability for the bridge client.
//!
//! Every chain interaction the bridge flow makes goes through the [`Wallet`]
//! trait, so the flow can run against a local key, an external wallet, or a
//! test double without change.

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
mod provider_wallet;
mod rpc_wallet;

use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use std::future::Future;
use thiserror::Error;

pub use provider_wallet::{connect_local_wallet, ProviderWallet};
pub use rpc_wallet::JsonRpcWallet;

/// EIP-1193 `User Rejected Request`.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum WalletError {
    /// No wallet reachable, or the wallet exposes no account
    #[error("Wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The user declined to sign
    #[error("User rejected the request")]
    UserRejected,

    /// A call or transaction reverted
    #[error("Execution reverted: {0}")]
    Reverted(String),

    /// Account cannot cover value plus gas
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Any other JSON-RPC failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

impl WalletError {
    /// Classify a JSON-RPC error object returned by a node or wallet.
    pub fn from_rpc_error(code: i64, message: &str) -> Self {
        // EIP-1193 provider errors
        match code {
            USER_REJECTED_CODE => return Self::UserRejected,
            4100 | 4900 | 4901 => return Self::ProviderUnavailable(message.to_string()),
            _ => {}
        }

        let lower = message.to_lowercase();
        if lower.contains("insufficient funds") {
            Self::InsufficientFunds(message.to_string())
        } else if lower.contains("revert") {
            Self::Reverted(message.to_string())
        } else {
            Self::Rpc(format!("{code}: {message}"))
        }
    }
}

/// A transaction that has been included on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
}

/// Capability to read chain state and submit transactions as one account.
pub trait Wallet: Send + Sync {
    /// Ask the wallet for the accounts it exposes (`eth_requestAccounts`).
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// The account transactions are sent from: the first exposed account.
    fn signer_address(&self) -> impl Future<Output = Result<Address, WalletError>> + Send {
        async move {
            self.request_accounts()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| WalletError::ProviderUnavailable("wallet exposes no accounts".into()))
        }
    }

    /// Execute a read-only call against the latest block.
    fn call(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Submit a transaction and wait for one confirmation.
    ///
    /// A transaction that is mined but reverted is an error.
    fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<TxConfirmation, WalletError>> + Send;
}

impl<W: Wallet> Wallet for &W {
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send {
        (**self).request_accounts()
    }

    fn call(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send {
        (**self).call(tx)
    }

    fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<TxConfirmation, WalletError>> + Send {
        (**self).send_transaction(tx)
    }
}

/// Convenience function to create an ethereum rpc provider from url.
pub async fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, WalletError> {
    let url = rpc_url
        .parse()
        .map_err(|e| WalletError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(matches!(result, Err(WalletError::InvalidUrl(_))));
    }

    #[test]
    fn test_user_rejected_code() {
        let err = WalletError::from_rpc_error(4001, "User denied transaction signature");
        assert!(matches!(err, WalletError::UserRejected));
    }

    #[test]
    fn test_disconnected_codes() {
        for code in [4100, 4900, 4901] {
            let err = WalletError::from_rpc_error(code, "disconnected");
            assert!(matches!(err, WalletError::ProviderUnavailable(_)));
        }
    }

    #[test]
    fn test_message_classification() {
        let err = WalletError::from_rpc_error(
            -32000,
            "insufficient funds for gas * price + value",
        );
        assert!(matches!(err, WalletError::InsufficientFunds(_)));

        let err = WalletError::from_rpc_error(3, "execution reverted: ERC20: transfer amount");
        assert!(matches!(err, WalletError::Reverted(_)));

        let err = WalletError::from_rpc_error(-32603, "internal error");
        assert_eq!(err.to_string(), "RPC error: -32603: internal error");
    }

    #[tokio::test]
    async fn test_signer_address_is_first_account() {
        let first = Address::repeat_byte(1);
        let wallet = mock::MockWallet::with_accounts(vec![first, Address::repeat_byte(2)]);

        assert_eq!(wallet.signer_address().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_signer_address_without_accounts() {
        let wallet = mock::MockWallet::with_accounts(vec![]);

        let err = wallet.signer_address().await.unwrap_err();
        assert!(matches!(err, WalletError::ProviderUnavailable(_)));
    }
}
