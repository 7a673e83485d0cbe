use crate::{FlowState, SessionError, Step};
use action::{check_allowance, parse_amount, Action, ApproveAction, BridgeDepositAction};
use alloy_primitives::{Address, U256};
use client::Wallet;
use config::{NetworkConfig, VaultConfig};
use quote::QuoteSource;
use tracing::{debug, info, warn};

/// One user's pass through the flow.
pub struct BridgeSession<W, Q> {
    wallet: W,
    quotes: Q,
    network: NetworkConfig,
    account: Option<Address>,
    amount_input: String,
    amount: Option<U256>,
    vault: Option<VaultConfig>,
    state: FlowState,
}

impl<W, Q> BridgeSession<W, Q>
where
    W: Wallet,
    Q: QuoteSource,
{
    /// Start a session. The network configuration is validated here.
    pub fn new(wallet: W, quotes: Q, network: NetworkConfig) -> Result<Self, SessionError> {
        network.validate()?;

        Ok(Self {
            wallet,
            quotes,
            network,
            account: None,
            amount_input: String::new(),
            amount: None,
            vault: None,
            state: FlowState::Idle,
        })
    }

    pub const fn state(&self) -> FlowState {
        self.state
    }

    pub const fn account(&self) -> Option<Address> {
        self.account
    }

    /// Parsed amount in the token's smallest unit.
    pub const fn amount(&self) -> Option<U256> {
        self.amount
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub const fn vault(&self) -> Option<&VaultConfig> {
        self.vault.as_ref()
    }

    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub const fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Vault whose input token is being bridged: the selected one, or the
    /// first in the catalogue until a selection is made.
    fn active_vault(&self) -> &VaultConfig {
        self.vault.as_ref().unwrap_or(&self.network.vaults[0])
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }
        if self.state.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }
        Ok(())
    }

    /// Request the wallet's accounts and record the first one.
    ///
    /// Allowance is read right away when an amount is already set.
    pub async fn connect(&mut self) -> Result<Address, SessionError> {
        let account = self.wallet.signer_address().await.map_err(|e| {
            warn!(error = %e, "Wallet connection failed");
            action::BridgeError::from(e)
        })?;

        info!(%account, "Wallet connected");
        self.account = Some(account);

        if self.amount.is_some() && !self.state.is_busy() && !self.state.is_complete() {
            self.refresh_allowance().await?;
        }

        Ok(account)
    }

    /// Set the human-entered amount. An empty string clears it.
    pub async fn set_amount(&mut self, input: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;

        self.amount_input = input.trim().to_string();
        self.clear_approval();
        self.reparse_amount()?;

        self.refresh_if_ready().await
    }

    /// Select a destination vault from the catalogue by symbol.
    pub async fn select_vault(&mut self, symbol: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;

        let vault = self
            .network
            .vault(symbol)
            .cloned()
            .ok_or_else(|| SessionError::UnknownVault(symbol.to_string()))?;

        debug!(vault = %vault.symbol, address = %vault.vault, "Vault selected");
        self.vault = Some(vault);
        self.clear_approval();
        self.reparse_amount()?;

        self.refresh_if_ready().await
    }

    /// An approval only holds for the amount and token it was read for.
    fn clear_approval(&mut self) {
        if self.state == FlowState::Approved {
            self.state = FlowState::Idle;
        }
    }

    fn reparse_amount(&mut self) -> Result<(), SessionError> {
        if self.amount_input.is_empty() {
            self.amount = None;
            return Ok(());
        }

        let decimals = self.active_vault().decimals;
        match parse_amount(&self.amount_input, decimals) {
            Ok(amount) => {
                self.amount = Some(amount);
                Ok(())
            }
            Err(e) => {
                self.amount = None;
                self.state = FlowState::Idle;
                Err(e.into())
            }
        }
    }

    async fn refresh_if_ready(&mut self) -> Result<(), SessionError> {
        if self.account.is_some() && self.amount.is_some() {
            self.refresh_allowance().await?;
        }
        Ok(())
    }

    /// Re-read the allowance and move between `Idle` and `Approved`.
    pub async fn refresh_allowance(&mut self) -> Result<bool, SessionError> {
        self.account.ok_or(SessionError::NotConnected)?;
        let amount = self.amount.ok_or(SessionError::MissingAmount)?;

        let token = self.active_vault().input_token;
        let spender = self.network.origin.spoke_pool;
        let approved = check_allowance(&self.wallet, token, spender, amount).await?;

        if matches!(self.state, FlowState::Idle | FlowState::Approved) {
            self.state = if approved {
                FlowState::Approved
            } else {
                FlowState::Idle
            };
        }

        debug!(approved, state = %self.state, "Allowance refreshed");

        Ok(approved)
    }

    /// Whether [`Self::submit`] would start a step.
    pub const fn can_submit(&self) -> bool {
        self.account.is_some()
            && self.amount.is_some()
            && self.vault.is_some()
            && matches!(self.state, FlowState::Idle | FlowState::Approved)
    }

    /// Label of the submit control for the current state.
    pub const fn action_label(&self) -> &'static str {
        match self.state {
            FlowState::Idle => "Approve",
            FlowState::AwaitingApproval => "Approving...",
            FlowState::Approved => "Bridge + Deposit",
            FlowState::Bridging => "Bridging and depositing...",
            FlowState::Complete { .. } => "Transaction complete!",
        }
    }

    /// Run the next step: approve when the allowance is short, otherwise
    /// bridge and deposit.
    ///
    /// A failed approval returns the session to `Idle`; a failed bridge
    /// returns it to `Approved`, since the approval stays valid on chain.
    pub async fn submit(&mut self) -> Result<Step, SessionError> {
        self.ensure_editable()?;

        self.account.ok_or(SessionError::NotConnected)?;
        let amount = self.amount.ok_or(SessionError::MissingAmount)?;
        if self.vault.is_none() {
            return Err(SessionError::MissingVault);
        }

        match self.state {
            FlowState::Idle => self.approve(amount).await,
            _ => self.bridge(amount).await,
        }
    }

    async fn approve(&mut self, amount: U256) -> Result<Step, SessionError> {
        self.state = FlowState::AwaitingApproval;

        let token = self.active_vault().input_token;
        let mut approve =
            ApproveAction::new(&self.wallet, token, self.network.origin.spoke_pool, amount);
        info!(action = %approve.description(), "Starting approval");

        match approve.execute().await {
            Ok(confirmation) => {
                self.state = FlowState::Approved;
                Ok(Step::Approved(confirmation))
            }
            Err(e) => {
                warn!(error = %e, "Approval failed");
                self.state = FlowState::Idle;
                Err(e.into())
            }
        }
    }

    async fn bridge(&mut self, amount: U256) -> Result<Step, SessionError> {
        self.state = FlowState::Bridging;

        let result = {
            let mut deposit = BridgeDepositAction::new(
                &self.wallet,
                &self.quotes,
                &self.network,
                self.active_vault(),
                amount,
            );
            info!(action = %deposit.description(), "Starting bridge deposit");
            deposit.execute().await
        };

        match result {
            Ok(confirmation) => {
                self.state = FlowState::Complete {
                    tx_hash: confirmation.tx_hash,
                };
                Ok(Step::Bridged(confirmation))
            }
            Err(e) => {
                warn!(error = %e, "Bridge failed");
                self.state = FlowState::Approved;
                Err(e.into())
            }
        }
    }
}
