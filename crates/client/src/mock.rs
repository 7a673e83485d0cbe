//! In-memory [`Wallet`] for tests.
//!
//! Answers ERC20 `allowance` / `balanceOf` reads from its own state and
//! applies `approve` transactions to that state, so a full approve-then-bridge
//! flow can run without a chain.

use crate::{TxConfirmation, Wallet, WalletError};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{SolCall, SolValue};
use binding::token::IERC20;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Address>,
    allowance: U256,
    balance: U256,
    sent: Vec<TransactionRequest>,
    send_error: Option<WalletError>,
    call_error: Option<WalletError>,
}

/// Test double for [`Wallet`].
#[derive(Debug, Default)]
pub struct MockWallet {
    state: Mutex<MockState>,
}

impl MockWallet {
    /// A wallet exposing a single account.
    pub fn new(account: Address) -> Self {
        Self::with_accounts(vec![account])
    }

    /// A wallet exposing the given accounts (possibly none).
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            state: Mutex::new(MockState {
                accounts,
                ..Default::default()
            }),
        }
    }

    /// Set the allowance every `allowance` read returns.
    pub fn set_allowance(&self, allowance: U256) {
        self.lock().allowance = allowance;
    }

    /// Set the balance every `balanceOf` read returns.
    pub fn set_balance(&self, balance: U256) {
        self.lock().balance = balance;
    }

    /// Current allowance as seen by reads.
    pub fn allowance(&self) -> U256 {
        self.lock().allowance
    }

    /// Make the next `send_transaction` fail with `error`.
    pub fn fail_next_send(&self, error: WalletError) {
        self.lock().send_error = Some(error);
    }

    /// Make the next `call` fail with `error`.
    pub fn fail_next_call(&self, error: WalletError) {
        self.lock().call_error = Some(error);
    }

    /// Transactions successfully submitted so far, in order.
    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock wallet lock poisoned")
    }
}

fn calldata(tx: &TransactionRequest) -> Bytes {
    tx.input.input().cloned().unwrap_or_default()
}

impl Wallet for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.lock().accounts.clone())
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, WalletError> {
        let mut state = self.lock();
        if let Some(error) = state.call_error.take() {
            return Err(error);
        }

        let data = calldata(&tx);
        if data.starts_with(&IERC20::allowanceCall::SELECTOR) {
            Ok(state.allowance.abi_encode().into())
        } else if data.starts_with(&IERC20::balanceOfCall::SELECTOR) {
            Ok(state.balance.abi_encode().into())
        } else {
            Err(WalletError::Reverted("unsupported call".to_string()))
        }
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxConfirmation, WalletError> {
        let mut state = self.lock();
        if let Some(error) = state.send_error.take() {
            return Err(error);
        }

        let data = calldata(&tx);
        if let Ok(approve) = IERC20::approveCall::abi_decode(&data) {
            state.allowance = approve.amount;
        }

        state.sent.push(tx);
        let nonce = state.sent.len() as u8;

        Ok(TxConfirmation {
            tx_hash: B256::repeat_byte(nonce),
            block_number: Some(u64::from(nonce)),
            gas_used: 21_000,
        })
    }
}
