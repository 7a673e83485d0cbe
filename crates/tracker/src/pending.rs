use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use binding::across::ISpokePool;
use config::NetworkConfig;
use std::collections::HashSet;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Largest block range requested per `eth_getLogs` call.
const CHUNK_SIZE: u64 = 9_500;

/// A deposit made on the origin chain that has not been filled yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeposit {
    /// Deposit ID on the origin SpokePool
    pub deposit_id: U256,
    /// Amount pulled from the depositor
    pub input_amount: U256,
    /// Amount the relayer must deliver
    pub output_amount: U256,
    /// Latest fill time (unix seconds)
    pub fill_deadline: u32,
    /// Origin block the deposit was included in
    pub block_number: u64,
    /// Deposit transaction
    pub tx_hash: Option<TxHash>,
}

impl PendingDeposit {
    /// No relayer can fill the deposit anymore; the funds are refunded on
    /// the origin chain instead.
    pub const fn is_expired(&self, now: u32) -> bool {
        now > self.fill_deadline
    }
}

/// Scans the origin SpokePool for deposits and the destination SpokePool
/// for their fills.
pub struct DepositTracker<P1, P2> {
    origin_provider: P1,
    destination_provider: P2,
    network: NetworkConfig,
}

impl<P1, P2> DepositTracker<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(origin_provider: P1, destination_provider: P2, network: NetworkConfig) -> Self {
        Self {
            origin_provider,
            destination_provider,
            network,
        }
    }

    /// Deposits by `depositor` within the last `lookback_secs` that have no
    /// matching fill on the destination chain.
    pub async fn pending_deposits(
        &self,
        depositor: Address,
        lookback_secs: u64,
    ) -> eyre::Result<Vec<PendingDeposit>> {
        let origin_lookback = lookback_secs / self.network.origin.block_time_secs.max(1);
        let destination_lookback =
            lookback_secs / self.network.destination.block_time_secs.max(1);

        let origin_head = self.origin_provider.get_block_number().await?;
        let destination_head = self.destination_provider.get_block_number().await?;

        let origin_from = origin_head.saturating_sub(origin_lookback);
        let destination_from = destination_head.saturating_sub(destination_lookback);

        debug!(
            origin_from,
            origin_to = origin_head,
            destination_from,
            destination_to = destination_head,
            lookback_secs,
            %depositor,
            "Scanning for pending deposits"
        );

        let mut deposits = Vec::new();
        for (from, to) in block_chunks(origin_from, origin_head) {
            deposits.extend(self.scan_deposits_with_retry(depositor, from, to).await?);
        }

        if deposits.is_empty() {
            debug!("No deposits found in range");
            return Ok(vec![]);
        }

        debug!(count = deposits.len(), "Found deposits, checking for fills");

        let mut filled = HashSet::new();
        for (from, to) in block_chunks(destination_from, destination_head) {
            filled.extend(self.scan_fills_with_retry(from, to).await?);
        }

        let pending = unfilled(deposits, &filled);

        debug!(pending = pending.len(), "Pending deposits after filtering");

        Ok(pending)
    }

    /// Sum of the input amounts of all pending deposits.
    pub async fn pending_total(&self, depositor: Address, lookback_secs: u64) -> eyre::Result<U256> {
        let pending = self.pending_deposits(depositor, lookback_secs).await?;
        Ok(pending.iter().map(|d| d.input_amount).sum())
    }

    async fn scan_deposits_with_retry(
        &self,
        depositor: Address,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<PendingDeposit>> {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);

        Retry::spawn(retry_strategy, || async {
            self.scan_deposits(depositor, from_block, to_block)
                .await
                .map_err(|e| {
                    warn!(
                        from = from_block,
                        to = to_block,
                        error = %e,
                        "Deposit scan failed, will retry"
                    );
                    e
                })
        })
        .await
    }

    async fn scan_deposits(
        &self,
        depositor: Address,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<PendingDeposit>> {
        let contract = ISpokePool::new(self.network.origin.spoke_pool, &self.origin_provider);

        let events = contract
            .FundsDeposited_filter()
            .topic1(U256::from(self.network.destination.chain_id)) // destinationChainId
            .topic3(depositor.into_word()) // depositor
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events
            .into_iter()
            .map(|(event, log)| PendingDeposit {
                deposit_id: event.depositId,
                input_amount: event.inputAmount,
                output_amount: event.outputAmount,
                fill_deadline: event.fillDeadline,
                block_number: log.block_number.unwrap_or_default(),
                tx_hash: log.transaction_hash,
            })
            .collect())
    }

    async fn scan_fills_with_retry(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<U256>> {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);

        Retry::spawn(retry_strategy, || async {
            self.scan_fills(from_block, to_block).await.map_err(|e| {
                warn!(
                    from = from_block,
                    to = to_block,
                    error = %e,
                    "Fill scan failed, will retry"
                );
                e
            })
        })
        .await
    }

    async fn scan_fills(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<U256>> {
        let contract = ISpokePool::new(
            self.network.destination.spoke_pool,
            &self.destination_provider,
        );

        let events = contract
            .FilledRelay_filter()
            .topic1(U256::from(self.network.origin.chain_id)) // originChainId
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.depositId).collect())
    }
}

/// Inclusive `(from, to)` ranges of at most [`CHUNK_SIZE`] blocks.
fn block_chunks(from_block: u64, to_block: u64) -> impl Iterator<Item = (u64, u64)> {
    let mut next = (from_block <= to_block).then_some(from_block);
    std::iter::from_fn(move || {
        let start = next?;
        let end = start.saturating_add(CHUNK_SIZE - 1).min(to_block);
        next = end.checked_add(1).filter(|n| *n <= to_block);
        Some((start, end))
    })
}

fn unfilled(deposits: Vec<PendingDeposit>, filled: &HashSet<U256>) -> Vec<PendingDeposit> {
    deposits
        .into_iter()
        .filter(|d| !filled.contains(&d.deposit_id))
        .collect()
}
