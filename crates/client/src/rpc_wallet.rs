//! Wallet that delegates account access and signing to an external EIP-1193 wallet.
//!
//! Desktop wallets such as Frame expose the same request interface a browser
//! injects as `window.ethereum`, served over HTTP JSON-RPC. Signing (and any
//! user confirmation prompt) happens inside that wallet.

use crate::{TxConfirmation, Wallet, WalletError};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_rpc_types::{TransactionInput, TransactionReceipt, TransactionRequest};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// A [`Wallet`] that talks to an external wallet over HTTP JSON-RPC.
///
/// # Example
///
/// ```ignore
/// let wallet = JsonRpcWallet::new("http://127.0.0.1:1248", Duration::from_secs(2));
/// let account = wallet.signer_address().await?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonRpcWallet {
    client: reqwest::Client,
    url: String,
    poll_interval: Duration,
}

impl JsonRpcWallet {
    /// Creates a new wallet client.
    ///
    /// # Arguments
    /// * `url` - The wallet's JSON-RPC endpoint (e.g., "http://127.0.0.1:1248")
    /// * `poll_interval` - How often to poll for a receipt after sending
    pub fn new(url: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            poll_interval,
        }
    }

    /// Ask the wallet to switch to `chain_id` (`wallet_switchEthereumChain`).
    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        debug!(chain_id, url = %self.url, "Switching wallet chain");
        let _: Option<serde_json::Value> = self
            .request_optional("wallet_switchEthereumChain", [switch_chain_params(chain_id)])
            .await?;
        Ok(())
    }

    /// Send a request whose result must not be null.
    async fn request<P, T>(&self, method: &'static str, params: P) -> Result<T, WalletError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        self.request_optional(method, params)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("{method} returned no result")))
    }

    /// Send a request whose result may legitimately be null.
    async fn request_optional<P, T>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<Option<T>, WalletError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(WalletError::ProviderUnavailable(format!(
                "wallet returned {status}: {body}"
            )));
        }

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| WalletError::Rpc(format!("invalid {method} response: {e}")))?;

        rpc_response.into_result()
    }
}

impl Wallet for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request("eth_requestAccounts", serde_json::json!([])).await
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, WalletError> {
        self.request("eth_call", (normalize_input(tx), "latest"))
            .await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxConfirmation, WalletError> {
        let from = match tx.from {
            Some(from) => from,
            None => self.signer_address().await?,
        };
        let tx_hash: TxHash = self
            .request("eth_sendTransaction", [send_params(tx, from)])
            .await?;
        info!(tx_hash = %tx_hash, "Transaction sent, waiting for confirmation");

        loop {
            let receipt: Option<TransactionReceipt> = self
                .request_optional("eth_getTransactionReceipt", [tx_hash])
                .await?;

            if let Some(receipt) = receipt {
                if !receipt.status() {
                    return Err(WalletError::Reverted(format!("transaction {tx_hash}")));
                }

                debug!(tx_hash = %tx_hash, block = ?receipt.block_number, "Transaction confirmed");

                return Ok(TxConfirmation {
                    tx_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Wallets disagree on `input` vs `data`; send calldata under both keys.
fn normalize_input(mut tx: TransactionRequest) -> TransactionRequest {
    if let Some(input) = tx.input.input().cloned() {
        tx.input = TransactionInput::both(input);
    }
    tx
}

/// `eth_sendTransaction` requires the sending account.
fn send_params(mut tx: TransactionRequest, from: Address) -> TransactionRequest {
    tx.from = Some(from);
    normalize_input(tx)
}

fn switch_chain_params(chain_id: u64) -> serde_json::Value {
    serde_json::json!({ "chainId": format!("{chain_id:#x}") })
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

impl<T> JsonRpcResponse<T> {
    fn into_result(self) -> Result<Option<T>, WalletError> {
        match self.error {
            Some(error) => Err(WalletError::from_rpc_error(error.code, &error.message)),
            None => Ok(self.result),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
