pub mod config;
pub mod metrics;

use crate::metrics::Metrics;
use action::{
    format_amount, parse_amount, read_allowance, Action, ApproveAction, BridgeDepositAction,
    DepositParams, MulticallMessageBuilder,
};
use alloy_primitives::{Address, Bytes, U256};
use client::{TxConfirmation, Wallet};
use ::config::{NetworkConfig, VaultConfig};
use quote::{QuoteSource, RelayQuote};
use session::{BridgeSession, FlowState, Step};
use tracing::{info, warn};

/// Vault used when none is named on the command line.
pub const DEFAULT_VAULT: &str = "USDT Vault";

/// Look up a vault by symbol.
pub fn find_vault<'a>(network: &'a NetworkConfig, symbol: &str) -> eyre::Result<&'a VaultConfig> {
    network
        .vault(symbol)
        .ok_or_else(|| eyre::eyre!("Unknown vault {symbol:?}"))
}

/// Encoded multicall message depositing `amount` into `vault` for `recipient`.
pub fn encode_message(vault: &VaultConfig, recipient: Address, amount: &str) -> eyre::Result<Bytes> {
    let amount = parse_amount(amount, vault.decimals)?;
    Ok(MulticallMessageBuilder::for_vault(vault).build(recipient, amount))
}

/// Quote and the amount delivered after the relay fee.
pub async fn fetch_quote<W, Q>(
    wallet: W,
    quotes: Q,
    network: &NetworkConfig,
    vault: &VaultConfig,
    amount: &str,
    metrics: &Metrics,
) -> eyre::Result<(RelayQuote, U256)>
where
    W: Wallet,
    Q: QuoteSource,
{
    let amount = parse_amount(amount, vault.decimals)?;
    let depositor = wallet.signer_address().await?;
    let deposit = BridgeDepositAction::new(wallet, quotes, network, vault, amount);

    let quote = deposit.quote(depositor).await?;
    metrics.record_quote();

    let output = amount
        .checked_sub(quote.total_relay_fee)
        .filter(|output| !output.is_zero())
        .ok_or_else(|| {
            eyre::eyre!(
                "Relay fee {} leaves nothing of {}",
                format_amount(quote.total_relay_fee, vault.decimals),
                format_amount(amount, vault.decimals)
            )
        })?;

    Ok((quote, output))
}

/// Current allowance of the origin SpokePool and whether it covers `amount`.
pub async fn allowance_status<W: Wallet>(
    wallet: W,
    network: &NetworkConfig,
    vault: &VaultConfig,
    amount: &str,
    metrics: &Metrics,
) -> eyre::Result<(U256, bool)> {
    let amount = parse_amount(amount, vault.decimals)?;
    let owner = wallet.signer_address().await?;

    let allowance =
        read_allowance(&wallet, vault.input_token, owner, network.origin.spoke_pool).await?;
    metrics.set_allowance(allowance);

    Ok((allowance, allowance >= amount))
}

/// Approve the origin SpokePool for `amount`, unless already approved.
///
/// Returns `None` when no transaction was needed.
pub async fn approve<W: Wallet>(
    wallet: W,
    network: &NetworkConfig,
    vault: &VaultConfig,
    amount: &str,
    metrics: &Metrics,
) -> eyre::Result<Option<TxConfirmation>> {
    let amount = parse_amount(amount, vault.decimals)?;
    let mut approve =
        ApproveAction::new(wallet, vault.input_token, network.origin.spoke_pool, amount);

    if approve.is_satisfied().await? {
        info!("Allowance already covers the amount");
        return Ok(None);
    }

    match approve.execute().await {
        Ok(confirmation) => {
            metrics.record_approval();
            Ok(Some(confirmation))
        }
        Err(e) => {
            metrics.record_step_failure("approve");
            Err(e.into())
        }
    }
}

/// Plan a deposit without submitting anything.
pub async fn plan_deposit<W, Q>(
    wallet: W,
    quotes: Q,
    network: &NetworkConfig,
    vault: &VaultConfig,
    amount: &str,
    metrics: &Metrics,
) -> eyre::Result<DepositParams>
where
    W: Wallet,
    Q: QuoteSource,
{
    let amount = parse_amount(amount, vault.decimals)?;
    let deposit = BridgeDepositAction::new(wallet, quotes, network, vault, amount);

    let params = deposit.plan_now().await?;
    metrics.record_quote();

    Ok(params)
}

/// Drive a session from connection to a confirmed bridge deposit.
///
/// Runs the approval first when the allowance is short. Returns every
/// confirmed step in order.
pub async fn run_session<W, Q>(
    session: &mut BridgeSession<W, Q>,
    vault: &str,
    amount: &str,
    metrics: &Metrics,
) -> eyre::Result<Vec<Step>>
where
    W: Wallet,
    Q: QuoteSource,
{
    let account = session.connect().await?;
    session.select_vault(vault).await?;
    session.set_amount(amount).await?;

    info!(%account, state = %session.state(), "Session ready");

    let mut steps = Vec::new();
    while !session.state().is_complete() {
        let state = session.state();
        info!(action = session.action_label(), "Submitting");

        match session.submit().await {
            Ok(step) => {
                match &step {
                    Step::Approved(_) => metrics.record_approval(),
                    Step::Bridged(_) => {
                        metrics.record_quote();
                        if let Some(amount) = session.amount() {
                            metrics.record_deposit(amount);
                        }
                    }
                }
                steps.push(step);
            }
            Err(e) => {
                let name = if state == FlowState::Idle {
                    "approve"
                } else {
                    "bridge"
                };
                warn!(step = name, error = %e, "Step failed");
                metrics.record_step_failure(name);
                return Err(e.into());
            }
        }
    }

    Ok(steps)
}
