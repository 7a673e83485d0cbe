use crate::{allowance::check_allowance, call_request, BridgeError, TxConfirmation};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use binding::token::IERC20;
use client::Wallet;
use tracing::info;

/// Approve action granting the relay entry point an ERC20 allowance.
pub struct ApproveAction<W> {
    wallet: W,
    /// Token to approve
    token: Address,
    /// Spender (the origin SpokePool)
    spender: Address,
    /// Allowance to set
    amount: U256,
}

impl<W> ApproveAction<W>
where
    W: Wallet,
{
    pub const fn new(wallet: W, token: Address, spender: Address, amount: U256) -> Self {
        Self {
            wallet,
            token,
            spender,
            amount,
        }
    }

    fn validate(&self) -> Result<(), BridgeError> {
        if self.token == Address::ZERO {
            return Err(BridgeError::InvalidParams("token must not be zero".into()));
        }

        if self.spender == Address::ZERO {
            return Err(BridgeError::InvalidParams("spender must not be zero".into()));
        }

        if self.amount.is_zero() {
            return Err(BridgeError::InvalidAmount(
                "approval amount must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Whether the current allowance already covers the amount.
    pub async fn is_satisfied(&self) -> Result<bool, BridgeError> {
        check_allowance(&self.wallet, self.token, self.spender, self.amount).await
    }
}

impl<W> crate::Action for ApproveAction<W>
where
    W: Wallet,
{
    async fn is_ready(&self) -> Result<bool, BridgeError> {
        Ok(self.validate().is_ok())
    }

    async fn execute(&mut self) -> Result<TxConfirmation, BridgeError> {
        self.validate()?;

        let call = IERC20::approveCall {
            spender: self.spender,
            amount: self.amount,
        };
        let tx = call_request(self.token, call.abi_encode());

        info!(
            token = %self.token,
            spender = %self.spender,
            amount = %self.amount,
            "Submitting approval"
        );

        let confirmation = self.wallet.send_transaction(tx).await?;

        info!(tx_hash = %confirmation.tx_hash, "Approval confirmed");

        Ok(confirmation)
    }

    fn description(&self) -> String {
        format!(
            "Approve {} of token {} for spender {}",
            self.amount, self.token, self.spender
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use alloy_primitives::TxKind;
    use client::{mock::MockWallet, WalletError};

    fn action(wallet: &MockWallet, amount: u64) -> ApproveAction<&MockWallet> {
        ApproveAction::new(
            wallet,
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            U256::from(amount),
        )
    }

    #[tokio::test]
    async fn test_execute_sends_approve() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        let mut approve = action(&wallet, 100_000_000);

        let confirmation = approve.execute().await.unwrap();
        assert!(confirmation.block_number.is_some());

        let sent = wallet.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Some(TxKind::Call(Address::repeat_byte(0x11))));

        let call = IERC20::approveCall::abi_decode(sent[0].input.input().unwrap()).unwrap();
        assert_eq!(call.spender, Address::repeat_byte(0x22));
        assert_eq!(call.amount, U256::from(100_000_000u64));

        assert!(approve.is_satisfied().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_signature_propagates() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        wallet.fail_next_send(WalletError::UserRejected);
        let mut approve = action(&wallet, 1);

        let err = approve.execute().await.unwrap_err();
        assert!(matches!(err, BridgeError::Wallet(WalletError::UserRejected)));
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_zero_amount_not_ready() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        let mut approve = action(&wallet, 0);

        assert!(!approve.is_ready().await.unwrap());
        assert!(approve.execute().await.is_err());
        assert!(wallet.sent_transactions().is_empty());
    }

    #[test]
    fn test_description() {
        let wallet = MockWallet::new(Address::repeat_byte(1));
        let desc = action(&wallet, 5).description();

        assert!(desc.contains("Approve 5"));
        assert!(desc.contains("0x2222222222222222222222222222222222222222"));
    }
}
