use crate::{
    allowance::read_balance, call_request, message::MulticallMessageBuilder, BridgeError,
    TxConfirmation,
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use binding::across::ISpokePool;
use client::Wallet;
use config::{NetworkConfig, VaultConfig, FILL_DEADLINE_BUFFER_SECS};
use quote::{QuoteRequest, QuoteSource, RelayQuote};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Every argument of a `depositV3` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    /// Depositor address (who initiates the deposit)
    pub depositor: Address,
    /// Recipient on the destination chain (the multicall handler)
    pub recipient: Address,
    /// Input token on the origin chain
    pub input_token: Address,
    /// Output token on the destination chain. Zero lets the relayer resolve
    /// the equivalent of the input token.
    pub output_token: Address,
    /// Amount pulled from the depositor
    pub input_amount: U256,
    /// Amount delivered to the recipient (after fees)
    pub output_amount: U256,
    /// Destination chain ID
    pub destination_chain_id: u64,
    /// Exclusive relayer (address(0) for any relayer)
    pub exclusive_relayer: Address,
    /// Quote timestamp (unix seconds)
    pub quote_timestamp: u32,
    /// Fill deadline (unix seconds)
    pub fill_deadline: u32,
    /// End of the exclusivity window (unix seconds)
    pub exclusivity_deadline: u32,
    /// Instructions executed by the recipient on arrival
    pub message: Bytes,
}

impl DepositParams {
    /// Validate the deposit parameters.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.recipient == Address::ZERO {
            return Err(BridgeError::InvalidParams("recipient address is zero".into()));
        }

        if self.input_amount.is_zero() {
            return Err(BridgeError::InvalidAmount("input amount is zero".into()));
        }

        if self.output_amount.is_zero() || self.output_amount > self.input_amount {
            return Err(BridgeError::InvalidAmount(format!(
                "output amount {} must be within (0, {}]",
                self.output_amount, self.input_amount
            )));
        }

        Ok(())
    }

    /// The `depositV3` call carrying these parameters.
    pub fn into_call(self) -> ISpokePool::depositV3Call {
        ISpokePool::depositV3Call {
            depositor: self.depositor,
            recipient: self.recipient,
            inputToken: self.input_token,
            outputToken: self.output_token,
            inputAmount: self.input_amount,
            outputAmount: self.output_amount,
            destinationChainId: U256::from(self.destination_chain_id),
            exclusiveRelayer: self.exclusive_relayer,
            quoteTimestamp: self.quote_timestamp,
            fillDeadline: self.fill_deadline,
            exclusivityDeadline: self.exclusivity_deadline,
            message: self.message,
        }
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> Result<u32, BridgeError> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BridgeError::Clock(e.to_string()))?
        .as_secs();

    u32::try_from(secs).map_err(|_| BridgeError::Clock(format!("{secs} does not fit in u32")))
}

/// Latest time a relayer may fill a deposit requested at `now`.
pub fn fill_deadline(now: u32) -> Result<u32, BridgeError> {
    now.checked_add(FILL_DEADLINE_BUFFER_SECS)
        .ok_or_else(|| BridgeError::Clock(format!("fill deadline overflows from {now}")))
}

/// Bridge-and-deposit action: bridges the input token through Across and
/// deposits the delivered amount into a vault on the destination chain.
pub struct BridgeDepositAction<W, Q> {
    wallet: W,
    quotes: Q,
    origin_chain_id: u64,
    destination_chain_id: u64,
    spoke_pool: Address,
    handler: Address,
    input_token: Address,
    message: MulticallMessageBuilder,
    amount: U256,
}

impl<W, Q> BridgeDepositAction<W, Q>
where
    W: Wallet,
    Q: QuoteSource,
{
    pub fn new(
        wallet: W,
        quotes: Q,
        network: &NetworkConfig,
        vault: &VaultConfig,
        amount: U256,
    ) -> Self {
        Self {
            wallet,
            quotes,
            origin_chain_id: network.origin.chain_id,
            destination_chain_id: network.destination.chain_id,
            spoke_pool: network.origin.spoke_pool,
            handler: network.destination.multicall_handler,
            input_token: vault.input_token,
            message: MulticallMessageBuilder::for_vault(vault),
            amount,
        }
    }

    pub const fn amount(&self) -> U256 {
        self.amount
    }

    /// Fetch a relay quote for the full amount.
    pub async fn quote(&self, depositor: Address) -> Result<RelayQuote, BridgeError> {
        let request = QuoteRequest {
            token: self.input_token,
            amount: self.amount,
            origin_chain_id: self.origin_chain_id,
            destination_chain_id: self.destination_chain_id,
            message: self.message.build(depositor, self.amount),
            recipient: self.handler,
        };

        let quote = self.quotes.fetch_quote(&request).await?;

        debug!(
            fee = %quote.total_relay_fee,
            exclusive_relayer = %quote.exclusive_relayer,
            timestamp = quote.timestamp,
            "Fetched relay quote"
        );

        Ok(quote)
    }

    /// Build the deposit for a request made at `now`, without submitting it.
    ///
    /// The quote is requested with a message for the full amount; the
    /// submitted message is rebuilt for the amount left after the relay fee.
    pub async fn plan(&self, now: u32) -> Result<DepositParams, BridgeError> {
        if self.amount.is_zero() {
            return Err(BridgeError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }

        let depositor = self.wallet.signer_address().await?;
        let quote = self.quote(depositor).await?;

        if quote.total_relay_fee >= self.amount {
            return Err(BridgeError::FeeExceedsAmount {
                amount: self.amount,
                fee: quote.total_relay_fee,
            });
        }
        let output_amount = self.amount - quote.total_relay_fee;

        let params = DepositParams {
            depositor,
            recipient: self.handler,
            input_token: self.input_token,
            output_token: Address::ZERO,
            input_amount: self.amount,
            output_amount,
            destination_chain_id: self.destination_chain_id,
            exclusive_relayer: quote.exclusive_relayer,
            quote_timestamp: quote.timestamp,
            fill_deadline: fill_deadline(now)?,
            exclusivity_deadline: quote.exclusivity_deadline,
            message: self.message.build(depositor, output_amount),
        };
        params.validate()?;

        Ok(params)
    }

    /// [`Self::plan`] at the current time.
    pub async fn plan_now(&self) -> Result<DepositParams, BridgeError> {
        self.plan(unix_now()?).await
    }

    async fn ensure_balance(&self) -> Result<(), BridgeError> {
        let depositor = self.wallet.signer_address().await?;
        let available = read_balance(&self.wallet, self.input_token, depositor).await?;

        if available < self.amount {
            return Err(BridgeError::InsufficientFunds {
                required: self.amount,
                available,
            });
        }

        Ok(())
    }
}

impl<W, Q> crate::Action for BridgeDepositAction<W, Q>
where
    W: Wallet,
    Q: QuoteSource,
{
    async fn is_ready(&self) -> Result<bool, BridgeError> {
        Ok(!self.amount.is_zero()
            && self.spoke_pool != Address::ZERO
            && self.handler != Address::ZERO)
    }

    async fn execute(&mut self) -> Result<TxConfirmation, BridgeError> {
        self.ensure_balance().await?;

        let params = self.plan_now().await?;

        info!(
            depositor = %params.depositor,
            input_amount = %params.input_amount,
            output_amount = %params.output_amount,
            fill_deadline = params.fill_deadline,
            spoke_pool = %self.spoke_pool,
            "Submitting bridge deposit"
        );

        let tx = call_request(self.spoke_pool, params.into_call().abi_encode());
        let confirmation = self.wallet.send_transaction(tx).await?;

        info!(
            tx_hash = %confirmation.tx_hash,
            block = ?confirmation.block_number,
            "Bridge deposit confirmed"
        );

        Ok(confirmation)
    }

    fn description(&self) -> String {
        format!(
            "Bridge {} of {} from chain {} and deposit on chain {}",
            self.amount, self.input_token, self.origin_chain_id, self.destination_chain_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message::decode_message, Action};
    use alloy_primitives::TxKind;
    use binding::vault::IYearnVault;
    use client::{mock::MockWallet, WalletError};
    use quote::{mock::MockQuoteSource, QuoteError};

    const NOW: u32 = 1_700_000_000;

    fn user() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn quote_with_fee(fee: u64) -> RelayQuote {
        RelayQuote {
            total_relay_fee: U256::from(fee),
            exclusive_relayer: Address::repeat_byte(0xee),
            timestamp: NOW - 12,
            exclusivity_deadline: NOW + 60,
        }
    }

    fn action<'a>(
        wallet: &'a MockWallet,
        quotes: &'a MockQuoteSource,
        amount: u64,
    ) -> BridgeDepositAction<&'a MockWallet, &'a MockQuoteSource> {
        BridgeDepositAction::new(
            wallet,
            quotes,
            &NetworkConfig::mainnet(),
            &VaultConfig::usdt(),
            U256::from(amount),
        )
    }

    fn deposit_amount(message: &[u8]) -> U256 {
        let instructions = decode_message(message).unwrap();
        IYearnVault::depositCall::abi_decode(&instructions.calls[1].callData)
            .unwrap()
            .assets
    }

    #[tokio::test]
    async fn test_plan_subtracts_relay_fee() {
        let wallet = MockWallet::new(user());
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let params = action(&wallet, &quotes, 100_000_000).plan(NOW).await.unwrap();

        let network = NetworkConfig::mainnet();
        let vault = VaultConfig::usdt();
        assert_eq!(params.depositor, user());
        assert_eq!(params.recipient, network.destination.multicall_handler);
        assert_eq!(params.input_token, vault.input_token);
        assert_eq!(params.output_token, Address::ZERO);
        assert_eq!(params.input_amount, U256::from(100_000_000u64));
        assert_eq!(params.output_amount, U256::from(99_999_500u64));
        assert_eq!(params.destination_chain_id, 1);
        assert_eq!(params.exclusive_relayer, Address::repeat_byte(0xee));
        assert_eq!(params.quote_timestamp, NOW - 12);
        assert_eq!(params.exclusivity_deadline, NOW + 60);
        assert_eq!(params.fill_deadline, NOW + 18_000);
    }

    #[tokio::test]
    async fn test_quote_uses_full_amount_message() {
        let wallet = MockWallet::new(user());
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let params = action(&wallet, &quotes, 100_000_000).plan(NOW).await.unwrap();

        let requests = quotes.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, U256::from(100_000_000u64));
        assert_eq!(requests[0].origin_chain_id, 10);
        assert_eq!(requests[0].destination_chain_id, 1);
        assert_eq!(
            requests[0].recipient,
            NetworkConfig::mainnet().destination.multicall_handler
        );
        assert_eq!(
            deposit_amount(&requests[0].message),
            U256::from(100_000_000u64)
        );

        // Submitted message carries the post-fee amount.
        assert_eq!(deposit_amount(&params.message), U256::from(99_999_500u64));
        assert_eq!(requests[0].message.len(), params.message.len());
    }

    #[tokio::test]
    async fn test_message_encodes_output_for_any_amount() {
        for (amount, fee) in [(1_000u64, 1u64), (100_000_000, 500), (u64::MAX, 12_345)] {
            let wallet = MockWallet::new(user());
            let quotes = MockQuoteSource::new(quote_with_fee(fee));

            let params = action(&wallet, &quotes, amount).plan(NOW).await.unwrap();

            let expected = U256::from(amount - fee);
            assert_eq!(params.output_amount, expected);
            assert_eq!(deposit_amount(&params.message), expected);
            assert_ne!(deposit_amount(&params.message), U256::from(amount));
        }
    }

    #[tokio::test]
    async fn test_fill_deadline_from_clock() {
        let wallet = MockWallet::new(user());
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let before = unix_now().unwrap();
        let params = action(&wallet, &quotes, 100_000_000).plan_now().await.unwrap();
        let after = unix_now().unwrap();

        assert!(params.fill_deadline >= before + 18_000);
        assert!(params.fill_deadline <= after + 18_000);
    }

    #[tokio::test]
    async fn test_fee_equal_to_amount_rejected() {
        let wallet = MockWallet::new(user());
        let quotes = MockQuoteSource::new(quote_with_fee(1_000));

        let err = action(&wallet, &quotes, 1_000).plan(NOW).await.unwrap_err();
        assert!(matches!(err, BridgeError::FeeExceedsAmount { .. }));
    }

    #[tokio::test]
    async fn test_quote_failure_propagates() {
        let wallet = MockWallet::new(user());
        wallet.set_balance(U256::MAX);
        let quotes = MockQuoteSource::failing();

        let err = action(&wallet, &quotes, 1_000).execute().await.unwrap_err();
        assert!(matches!(err, BridgeError::Quote(QuoteError::Network(_))));
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_balance_stops_before_quote() {
        let wallet = MockWallet::new(user());
        wallet.set_balance(U256::from(999u64));
        let quotes = MockQuoteSource::new(quote_with_fee(1));

        let err = action(&wallet, &quotes, 1_000).execute().await.unwrap_err();
        assert!(matches!(err, BridgeError::InsufficientFunds { .. }));
        assert!(quotes.requests().is_empty());
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_execute_submits_to_spoke_pool() {
        let wallet = MockWallet::new(user());
        wallet.set_balance(U256::from(100_000_000u64));
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let confirmation = action(&wallet, &quotes, 100_000_000).execute().await.unwrap();
        assert!(confirmation.block_number.is_some());

        let sent = wallet.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].to,
            Some(TxKind::Call(NetworkConfig::mainnet().origin.spoke_pool))
        );
        assert!(sent[0].value.is_none());

        let call = ISpokePool::depositV3Call::abi_decode(sent[0].input.input().unwrap()).unwrap();
        assert_eq!(call.depositor, user());
        assert_eq!(call.inputAmount, U256::from(100_000_000u64));
        assert_eq!(call.outputAmount, U256::from(99_999_500u64));
        assert_eq!(call.destinationChainId, U256::from(1u64));
        assert_eq!(call.outputToken, Address::ZERO);
    }

    #[tokio::test]
    async fn test_rejected_deposit_propagates() {
        let wallet = MockWallet::new(user());
        wallet.set_balance(U256::MAX);
        wallet.fail_next_send(WalletError::UserRejected);
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let err = action(&wallet, &quotes, 100_000_000).execute().await.unwrap_err();
        assert!(matches!(err, BridgeError::Wallet(WalletError::UserRejected)));
    }

    #[tokio::test]
    async fn test_zero_amount_not_ready() {
        let wallet = MockWallet::new(user());
        let quotes = MockQuoteSource::new(quote_with_fee(0));
        let deposit = action(&wallet, &quotes, 0);

        assert!(!deposit.is_ready().await.unwrap());
        assert!(matches!(
            deposit.plan(NOW).await,
            Err(BridgeError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_recipient_rejected() {
        let wallet = MockWallet::new(user());
        wallet.set_balance(U256::MAX);
        let quotes = MockQuoteSource::new(quote_with_fee(500));

        let mut params = action(&wallet, &quotes, 100_000_000).plan(NOW).await.unwrap();
        assert!(params.validate().is_ok());

        params.recipient = Address::ZERO;
        assert!(matches!(
            params.validate(),
            Err(BridgeError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_fill_deadline_overflow() {
        assert_eq!(fill_deadline(NOW).unwrap(), NOW + 18_000);
        assert!(matches!(fill_deadline(u32::MAX), Err(BridgeError::Clock(_))));
    }
}
