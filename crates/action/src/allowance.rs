//! ERC20 reads used to gate the approve and bridge steps.

use crate::{call_request, BridgeError};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use binding::token::IERC20;
use client::Wallet;
use tracing::debug;

/// Read `allowance(owner, spender)` on `token`.
pub async fn read_allowance<W: Wallet>(
    wallet: &W,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, BridgeError> {
    let call = IERC20::allowanceCall { owner, spender };
    let tx = call_request(token, call.abi_encode());

    let data = wallet.call(tx).await?;
    IERC20::allowanceCall::abi_decode_returns(&data)
        .map_err(|e| BridgeError::Decode(format!("allowance of {token}: {e}")))
}

/// Read `balanceOf(holder)` on `token`.
pub async fn read_balance<W: Wallet>(
    wallet: &W,
    token: Address,
    holder: Address,
) -> Result<U256, BridgeError> {
    let call = IERC20::balanceOfCall { account: holder };
    let tx = call_request(token, call.abi_encode());

    let data = wallet.call(tx).await?;
    IERC20::balanceOfCall::abi_decode_returns(&data)
        .map_err(|e| BridgeError::Decode(format!("balance of {token}: {e}")))
}

/// Whether the wallet's account has approved `spender` for at least `amount` of `token`.
pub async fn check_allowance<W: Wallet>(
    wallet: &W,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<bool, BridgeError> {
    let owner = wallet.signer_address().await?;
    let allowance = read_allowance(wallet, token, owner, spender).await?;

    debug!(
        %owner,
        %token,
        %spender,
        %allowance,
        required = %amount,
        "Checked allowance"
    );

    Ok(allowance >= amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use client::{mock::MockWallet, WalletError};

    const TOKEN: Address = address!("1111111111111111111111111111111111111111");
    const SPENDER: Address = address!("2222222222222222222222222222222222222222");

    #[tokio::test]
    async fn test_allowance_below_amount() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.set_allowance(U256::from(99_999_999u64));

        let approved = check_allowance(&wallet, TOKEN, SPENDER, U256::from(100_000_000u64))
            .await
            .unwrap();
        assert!(!approved);
    }

    #[tokio::test]
    async fn test_allowance_equal_to_amount() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.set_allowance(U256::from(100_000_000u64));

        let approved = check_allowance(&wallet, TOKEN, SPENDER, U256::from(100_000_000u64))
            .await
            .unwrap();
        assert!(approved);
    }

    #[tokio::test]
    async fn test_allowance_above_amount() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.set_allowance(U256::MAX);

        let approved = check_allowance(&wallet, TOKEN, SPENDER, U256::from(1u64))
            .await
            .unwrap();
        assert!(approved);
    }

    #[tokio::test]
    async fn test_allowance_read_failure_propagates() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.fail_next_call(WalletError::Reverted("execution reverted".into()));

        let err = check_allowance(&wallet, TOKEN, SPENDER, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Wallet(WalletError::Reverted(_))));
    }

    #[tokio::test]
    async fn test_allowance_without_account() {
        let wallet = MockWallet::with_accounts(vec![]);

        let err = check_allowance(&wallet, TOKEN, SPENDER, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Wallet(WalletError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_read_balance() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.set_balance(U256::from(42u64));

        let balance = read_balance(&wallet, TOKEN, Address::repeat_byte(1))
            .await
            .unwrap();
        assert_eq!(balance, U256::from(42u64));
    }
}
