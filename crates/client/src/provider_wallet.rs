//! Wallet backed by an alloy provider holding a local private key.

use crate::{TxConfirmation, Wallet, WalletError};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::TransportError;
use tracing::{debug, info};

/// A [`Wallet`] that signs locally through an alloy wallet provider.
#[derive(Debug, Clone)]
pub struct ProviderWallet<P> {
    provider: P,
    address: Address,
}

impl<P> ProviderWallet<P>
where
    P: Provider + Clone,
{
    /// Wrap a provider that already signs for `address`.
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

/// Create a wallet from an RPC url and a hex private key (with or without 0x prefix).
pub fn connect_local_wallet(
    rpc_url: &str,
    private_key: &str,
) -> Result<ProviderWallet<impl Provider + Clone>, WalletError> {
    let url = rpc_url
        .parse()
        .map_err(|e| WalletError::InvalidUrl(format!("{}", e)))?;

    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| WalletError::InvalidPrivateKey(format!("{}", e)))?;
    let address = signer.address();

    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(ProviderWallet::new(provider, address))
}

impl<P> Wallet for ProviderWallet<P>
where
    P: Provider + Clone,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address])
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, WalletError> {
        self.provider.call(tx).await.map_err(classify)
    }

    async fn send_transaction(
        &self,
        mut tx: TransactionRequest,
    ) -> Result<TxConfirmation, WalletError> {
        if tx.from.is_none() {
            tx.from = Some(self.address);
        }

        let pending = self.provider.send_transaction(tx).await.map_err(classify)?;
        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, "Transaction sent, waiting for confirmation");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| WalletError::Rpc(e.to_string()))?;

        if !receipt.status() {
            return Err(WalletError::Reverted(format!("transaction {tx_hash}")));
        }

        debug!(tx_hash = %tx_hash, block = ?receipt.block_number, "Transaction confirmed");

        Ok(TxConfirmation {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

/// Map a transport error onto the wallet error kinds.
fn classify(err: TransportError) -> WalletError {
    if err.is_transport_error() {
        return WalletError::ProviderUnavailable(err.to_string());
    }

    match err.as_error_resp() {
        Some(payload) => WalletError::from_rpc_error(payload.code, &payload.message),
        None => WalletError::Rpc(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first dev account
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_local_wallet_exposes_key_address() {
        let wallet = connect_local_wallet("http://localhost:8545", TEST_KEY).unwrap();

        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(
            accounts,
            vec![alloy_primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = connect_local_wallet("http://localhost:8545", "not a key");
        assert!(matches!(result, Err(WalletError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_invalid_url() {
        let result = connect_local_wallet("not a url", TEST_KEY);
        assert!(matches!(result, Err(WalletError::InvalidUrl(_))));
    }
}
