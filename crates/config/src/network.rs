//! Network configuration for the bridge-and-deposit flow.
//!
//! Provides chain-specific addresses and parameters, keyed by the origin
//! chain id. Every address the flow touches lives here; nothing downstream
//! hardcodes one.

use crate::ConfigError;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Across suggested-fees API base url.
pub const ACROSS_API_URL: &str = "https://app.across.to/api";

/// Seconds between quote time and the relay fill deadline (5 hours).
pub const FILL_DEADLINE_BUFFER_SECS: u32 = 18_000;

/// Origin chain configuration (where the user deposits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Across SpokePool contract address (relay entry point)
    pub spoke_pool: Address,
    /// Block time in seconds (2 for Optimism)
    pub block_time_secs: u64,
}

impl OriginChainConfig {
    /// Optimism mainnet configuration.
    pub const fn optimism() -> Self {
        Self {
            chain_id: 10,
            // https://optimistic.etherscan.io/address/0x6f26Bf09B1C792e3228e5467807a900A503c0281
            spoke_pool: address!("0x6f26Bf09B1C792e3228e5467807a900A503c0281"),
            block_time_secs: 2,
        }
    }
}

/// Destination chain configuration (where the vault lives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Across MulticallHandler, the recipient of every deposit
    pub multicall_handler: Address,
    /// Across SpokePool contract address (fills are observed here)
    pub spoke_pool: Address,
    /// Block time in seconds (12 for Ethereum mainnet)
    pub block_time_secs: u64,
}

impl DestinationChainConfig {
    /// Ethereum mainnet configuration.
    pub const fn ethereum() -> Self {
        Self {
            chain_id: 1,
            // https://etherscan.io/address/0x924a9f036260DdD5808007E1AA95f08eD08aA569
            multicall_handler: address!("0x924a9f036260DdD5808007E1AA95f08eD08aA569"),
            // https://etherscan.io/address/0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5
            spoke_pool: address!("0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5"),
            block_time_secs: 12,
        }
    }
}

/// A destination vault the user can select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Short label shown to the user (e.g. "USDT Vault")
    pub symbol: String,
    /// Descriptive name
    pub name: String,
    /// Vault contract on the destination chain
    pub vault: Address,
    /// Underlying asset of the vault on the destination chain
    pub asset: Address,
    /// Token the user bridges from the origin chain
    pub input_token: Address,
    /// Decimals of the input token
    pub decimals: u8,
}

impl VaultConfig {
    /// Yearn V3 USDT vault on Ethereum, funded with USDT from Optimism.
    pub fn usdt() -> Self {
        Self {
            symbol: "USDT Vault".to_string(),
            name: "USD Tether Vault".to_string(),
            vault: address!("0x310B7Ea7475A0B449Cfd73bE81522F1B88eFAFaa"),
            asset: address!("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
            input_token: address!("0x94b008aA00579c1307B0EF2c499aD98a8ce58e58"),
            decimals: 6,
        }
    }
}

/// Complete network configuration for the bridge flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Origin chain (deposit side)
    pub origin: OriginChainConfig,
    /// Destination chain (fill and vault side)
    pub destination: DestinationChainConfig,
    /// Vaults available for deposit
    pub vaults: Vec<VaultConfig>,
}

impl NetworkConfig {
    /// Optimism → Ethereum mainnet configuration.
    pub fn mainnet() -> Self {
        Self {
            origin: OriginChainConfig::optimism(),
            destination: DestinationChainConfig::ethereum(),
            vaults: vec![VaultConfig::usdt()],
        }
    }

    /// Look up the built-in configuration for an origin chain.
    pub fn for_origin_chain(chain_id: u64) -> Result<Self, ConfigError> {
        match chain_id {
            10 => Ok(Self::mainnet()),
            other => Err(ConfigError::UnsupportedChain(other)),
        }
    }

    /// Find a vault by its symbol.
    pub fn vault(&self, symbol: &str) -> Option<&VaultConfig> {
        self.vaults.iter().find(|v| v.symbol == symbol)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin.chain_id == self.destination.chain_id {
            return Err(ConfigError::SameChain(self.origin.chain_id));
        }

        non_zero("origin.spoke_pool", self.origin.spoke_pool)?;
        non_zero("destination.multicall_handler", self.destination.multicall_handler)?;
        non_zero("destination.spoke_pool", self.destination.spoke_pool)?;

        if self.vaults.is_empty() {
            return Err(ConfigError::NoVaults);
        }

        for vault in &self.vaults {
            non_zero("vault.vault", vault.vault)?;
            non_zero("vault.asset", vault.asset)?;
            non_zero("vault.input_token", vault.input_token)?;
        }

        Ok(())
    }
}

fn non_zero(field: &'static str, address: Address) -> Result<(), ConfigError> {
    if address == Address::ZERO {
        return Err(ConfigError::ZeroAddress(field));
    }
    Ok(())
}

impl From<NetworkConfig> for NetworkConfigBuilder {
    fn from(config: NetworkConfig) -> Self {
        Self {
            origin: config.origin,
            destination: config.destination,
            vaults: config.vaults,
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    origin: OriginChainConfig,
    destination: DestinationChainConfig,
    vaults: Vec<VaultConfig>,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub fn mainnet() -> Self {
        NetworkConfig::mainnet().into()
    }

    /// Override origin SpokePool address.
    pub const fn origin_spoke_pool(mut self, address: Address) -> Self {
        self.origin.spoke_pool = address;
        self
    }

    /// Override destination MulticallHandler address.
    pub const fn multicall_handler(mut self, address: Address) -> Self {
        self.destination.multicall_handler = address;
        self
    }

    /// Override destination SpokePool address.
    pub const fn destination_spoke_pool(mut self, address: Address) -> Self {
        self.destination.spoke_pool = address;
        self
    }

    /// Add a vault, replacing any existing vault with the same symbol.
    pub fn vault(mut self, vault: VaultConfig) -> Self {
        self.vaults.retain(|v| v.symbol != vault.symbol);
        self.vaults.push(vault);
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        NetworkConfig {
            origin: self.origin,
            destination: self.destination,
            vaults: self.vaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.origin.chain_id, 10);
        assert_eq!(config.destination.chain_id, 1);
        assert_eq!(config.vaults.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_origin_chain() {
        assert_eq!(
            NetworkConfig::for_origin_chain(10).unwrap(),
            NetworkConfig::mainnet()
        );

        let err = NetworkConfig::for_origin_chain(130).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedChain(130)));
    }

    #[test]
    fn test_vault_lookup() {
        let config = NetworkConfig::mainnet();
        let vault = config.vault("USDT Vault").unwrap();
        assert_eq!(vault.decimals, 6);
        assert!(config.vault("DAI Vault").is_none());
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_spoke_pool = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::mainnet()
            .origin_spoke_pool(custom_spoke_pool)
            .build();

        assert_eq!(config.origin.spoke_pool, custom_spoke_pool);
        assert_eq!(config.destination, DestinationChainConfig::ethereum());
    }

    #[test]
    fn test_builder_replaces_vault_with_same_symbol() {
        let mut vault = VaultConfig::usdt();
        vault.vault = address!("2222222222222222222222222222222222222222");

        let config = NetworkConfigBuilder::mainnet().vault(vault.clone()).build();

        assert_eq!(config.vaults, vec![vault]);
    }

    #[test]
    fn test_validate_zero_handler() {
        let config = NetworkConfigBuilder::mainnet()
            .multicall_handler(Address::ZERO)
            .build();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("multicall_handler"));
    }

    #[test]
    fn test_validate_same_chain() {
        let mut config = NetworkConfig::mainnet();
        config.destination.chain_id = config.origin.chain_id;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameChain(10))
        ));
    }

    #[test]
    fn test_validate_no_vaults() {
        let mut config = NetworkConfig::mainnet();
        config.vaults.clear();

        assert!(matches!(config.validate(), Err(ConfigError::NoVaults)));
    }
}
