//! Destination-chain payload for the Across MulticallHandler.
//!
//! The handler receives the bridged tokens and executes the encoded calls in
//! order, atomically. The payload has to match the handler's
//! `Instructions` ABI exactly: a mismatch only surfaces as a revert on the
//! destination chain after the relay has already been filled.

use crate::BridgeError;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolType};
use binding::{
    across::{Call, Instructions},
    token::IERC20,
    vault::IYearnVault,
};
use config::VaultConfig;

/// Builds the approve-then-deposit instruction set for one vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulticallMessageBuilder {
    vault: Address,
    asset: Address,
}

impl MulticallMessageBuilder {
    pub const fn new(vault: Address, asset: Address) -> Self {
        Self { vault, asset }
    }

    pub const fn for_vault(vault: &VaultConfig) -> Self {
        Self::new(vault.vault, vault.asset)
    }

    /// The two calls, in execution order: approve the vault on the asset,
    /// then deposit into the vault for `recipient`.
    pub fn instructions(&self, recipient: Address, deposit_amount: U256) -> Instructions {
        let approve = IERC20::approveCall {
            spender: self.vault,
            amount: deposit_amount,
        };
        let deposit = IYearnVault::depositCall {
            assets: deposit_amount,
            receiver: recipient,
        };

        Instructions {
            calls: vec![
                Call {
                    target: self.asset,
                    callData: approve.abi_encode().into(),
                    value: U256::ZERO,
                },
                Call {
                    target: self.vault,
                    callData: deposit.abi_encode().into(),
                    value: U256::ZERO,
                },
            ],
            fallbackRecipient: recipient,
        }
    }

    /// ABI-encoded instructions, ready to be passed as the deposit `message`.
    pub fn build(&self, recipient: Address, deposit_amount: U256) -> Bytes {
        let instructions = self.instructions(recipient, deposit_amount);
        <Instructions as SolType>::abi_encode(&instructions).into()
    }
}

/// Decode a deposit message back into its instructions.
pub fn decode_message(message: &[u8]) -> Result<Instructions, BridgeError> {
    <Instructions as SolType>::abi_decode(message)
        .map_err(|e| BridgeError::Decode(format!("multicall message: {e}")))
}
