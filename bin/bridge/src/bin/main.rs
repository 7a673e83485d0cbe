//! Bridge USDT from Optimism to Ethereum and deposit it into a Yearn V3 vault.
//!
//! Each step of the flow is exposed as a subcommand:
//! - `message`: print the multicall message the destination handler executes
//! - `quote`: fetch the relay fee and the amount that will arrive
//! - `allowance`: show whether the SpokePool allowance covers an amount
//! - `approve`: approve the SpokePool
//! - `deposit`: approve if needed, then bridge and deposit
//! - `status`: list deposits not yet filled on Ethereum

use alloy_primitives::Address;
use bridge::{
    allowance_status, approve, config::Config, encode_message, fetch_quote, find_vault,
    metrics::{install_prometheus_exporter, Metrics},
    plan_deposit, run_session, DEFAULT_VAULT,
};
use clap::{Parser, Subcommand};
use client::{connect_local_wallet, JsonRpcWallet, Wallet};
use config::NetworkConfig;
use quote::AcrossQuoteClient;
use session::{BridgeSession, Step};
use std::time::Duration;
use tracing::info;
use tracker::DepositTracker;

#[derive(Parser)]
#[command(name = "bridge")]
#[command(about = "Bridge from Optimism and deposit into a Yearn V3 vault on Ethereum")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    /// External wallet JSON-RPC endpoint, used when no private key is given
    #[arg(long, env = "WALLET_RPC_URL")]
    wallet_rpc: Option<String>,

    /// Dry-run mode: plan the deposit without submitting transactions
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the encoded multicall message
    Message {
        #[arg(long)]
        amount: String,
        /// Vault depositor (defaults to the wallet account)
        #[arg(long)]
        recipient: Option<Address>,
        #[arg(long, default_value = DEFAULT_VAULT)]
        vault: String,
    },

    /// Fetch a relay quote
    Quote {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = DEFAULT_VAULT)]
        vault: String,
    },

    /// Show the SpokePool allowance
    Allowance {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = DEFAULT_VAULT)]
        vault: String,
    },

    /// Approve the SpokePool to pull the amount
    Approve {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = DEFAULT_VAULT)]
        vault: String,
    },

    /// Approve if needed, then bridge and deposit
    Deposit {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = DEFAULT_VAULT)]
        vault: String,
    },

    /// List deposits not yet filled on the destination chain
    Status {
        /// Depositor to track (defaults to the wallet account)
        #[arg(long)]
        depositor: Option<Address>,
        /// Override the configured lookback window
        #[arg(long)]
        lookback_secs: Option<u64>,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = Config::from_file(&cli.config)?;

    // Override from CLI flags
    if cli.dry_run {
        config.dry_run = true;
    }
    if cli.wallet_rpc.is_some() {
        config.wallet_rpc_url.clone_from(&cli.wallet_rpc);
    }

    let network = config.network_config()?;

    info!("Loaded config:");
    info!("  Origin chain: {}", network.origin.chain_id);
    info!("  Origin SpokePool: {}", network.origin.spoke_pool);
    info!("  MulticallHandler: {}", network.destination.multicall_handler);
    info!("  Quote API: {}", config.quote_api_url);
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Metrics exporter listening");
    }
    let metrics = Metrics::new();

    // Commands that need no wallet when the address is given explicitly.
    match &cli.command {
        Command::Message {
            amount,
            recipient: Some(recipient),
            vault,
        } => {
            let vault = find_vault(&network, vault)?;
            println!("{}", encode_message(vault, *recipient, amount)?);
            return Ok(());
        }
        Command::Status {
            depositor: Some(depositor),
            lookback_secs,
        } => {
            let lookback = lookback_secs.unwrap_or(config.lookback_secs);
            return status(&config, network, *depositor, lookback, &metrics).await;
        }
        _ => {}
    }

    if let Some(private_key) = &cli.private_key {
        let wallet = connect_local_wallet(&config.origin_rpc_url, private_key)?;
        run(wallet, cli.command, &config, network, &metrics).await
    } else if let Some(url) = &config.wallet_rpc_url {
        let wallet = JsonRpcWallet::new(url.as_str(), Duration::from_secs(2));
        wallet.switch_chain(network.origin.chain_id).await?;
        run(wallet, cli.command, &config, network, &metrics).await
    } else {
        eyre::bail!("No wallet configured: pass --private-key (PRIVATE_KEY) or --wallet-rpc")
    }
}

async fn run<W: Wallet>(
    wallet: W,
    command: Command,
    config: &Config,
    network: NetworkConfig,
    metrics: &Metrics,
) -> eyre::Result<()> {
    let quotes = AcrossQuoteClient::new(config.quote_api_url.as_str());

    match command {
        Command::Message {
            amount,
            recipient,
            vault,
        } => {
            let recipient = match recipient {
                Some(recipient) => recipient,
                None => wallet.signer_address().await?,
            };
            let vault = find_vault(&network, &vault)?;
            println!("{}", encode_message(vault, recipient, &amount)?);
        }
        Command::Quote { amount, vault } => {
            let vault = find_vault(&network, &vault)?;
            let (quote, output) =
                fetch_quote(&wallet, &quotes, &network, vault, &amount, metrics).await?;

            println!(
                "relay fee:          {}",
                action::format_amount(quote.total_relay_fee, vault.decimals)
            );
            println!(
                "output amount:      {}",
                action::format_amount(output, vault.decimals)
            );
            println!("exclusive relayer:  {}", quote.exclusive_relayer);
            println!("quote timestamp:    {}", quote.timestamp);
            println!("exclusivity until:  {}", quote.exclusivity_deadline);
        }
        Command::Allowance { amount, vault } => {
            let vault = find_vault(&network, &vault)?;
            let (allowance, approved) =
                allowance_status(&wallet, &network, vault, &amount, metrics).await?;

            println!(
                "allowance: {} ({})",
                action::format_amount(allowance, vault.decimals),
                if approved { "approved" } else { "approval required" }
            );
        }
        Command::Approve { amount, vault } => {
            let vault = find_vault(&network, &vault)?;
            if config.dry_run {
                info!(%amount, spender = %network.origin.spoke_pool, "DRY-RUN: would approve");
                return Ok(());
            }

            match approve(&wallet, &network, vault, &amount, metrics).await? {
                Some(confirmation) => println!("approved: {}", confirmation.tx_hash),
                None => println!("allowance already sufficient"),
            }
        }
        Command::Deposit { amount, vault } => {
            if config.dry_run {
                let vault = find_vault(&network, &vault)?;
                let params = plan_deposit(&wallet, &quotes, &network, vault, &amount, metrics).await?;
                info!(?params, "DRY-RUN: would submit deposit");
                println!("{params:#?}");
                return Ok(());
            }

            let mut session = BridgeSession::new(&wallet, &quotes, network)?;
            for step in run_session(&mut session, &vault, &amount, metrics).await? {
                match step {
                    Step::Approved(c) => println!("approved: {}", c.tx_hash),
                    Step::Bridged(c) => println!("bridged:  {}", c.tx_hash),
                }
            }
        }
        Command::Status {
            depositor,
            lookback_secs,
        } => {
            let depositor = match depositor {
                Some(depositor) => depositor,
                None => wallet.signer_address().await?,
            };
            let lookback = lookback_secs.unwrap_or(config.lookback_secs);
            status(config, network, depositor, lookback, metrics).await?;
        }
    }

    Ok(())
}

async fn status(
    config: &Config,
    network: NetworkConfig,
    depositor: Address,
    lookback_secs: u64,
    metrics: &Metrics,
) -> eyre::Result<()> {
    let origin = client::create_provider(&config.origin_rpc_url).await?;
    let destination = client::create_provider(&config.destination_rpc_url).await?;

    let now = action::deposit::unix_now()?;
    let tracker = DepositTracker::new(origin, destination, network);
    let pending = tracker.pending_deposits(depositor, lookback_secs).await?;

    let total = pending.iter().map(|d| d.input_amount).sum();
    metrics.set_pending_deposits(pending.len(), total);

    if pending.is_empty() {
        println!("no pending deposits for {depositor}");
        return Ok(());
    }

    for deposit in &pending {
        println!(
            "deposit {} input {} output {} block {}{}",
            deposit.deposit_id,
            deposit.input_amount,
            deposit.output_amount,
            deposit.block_number,
            if deposit.is_expired(now) { " (expired)" } else { "" }
        );
    }
    println!("total pending: {total}");

    Ok(())
}
