use alloy_primitives::Address;
use config::{ConfigError, NetworkConfig, NetworkConfigBuilder, ACROSS_API_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level bridge client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin chain (Optimism) RPC endpoint url
    pub origin_rpc_url: String,

    /// Destination chain (Ethereum) RPC endpoint url
    pub destination_rpc_url: String,

    /// External EIP-1193 wallet endpoint, used when no private key is given
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,

    /// Across API base url
    #[serde(default = "default_quote_api_url")]
    pub quote_api_url: String,

    /// Origin chain id, selects the built-in network configuration
    #[serde(default = "default_origin_chain_id")]
    pub origin_chain_id: u64,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Plan deposits without submitting transactions
    #[serde(default)]
    pub dry_run: bool,

    /// How far back deposit tracking scans
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,

    #[serde(default)]
    pub overrides: AddressOverrides,
}

/// Replacements for built-in contract addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressOverrides {
    pub origin_spoke_pool: Option<Address>,
    pub multicall_handler: Option<Address>,
    pub destination_spoke_pool: Option<Address>,
}

fn default_quote_api_url() -> String {
    ACROSS_API_URL.to_string()
}

const fn default_origin_chain_id() -> u64 {
    10
}

const fn default_lookback_secs() -> u64 {
    12 * 60 * 60
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Built-in network configuration for the origin chain with overrides
    /// applied, validated.
    pub fn network_config(&self) -> Result<NetworkConfig, ConfigError> {
        let mut builder: NetworkConfigBuilder =
            NetworkConfig::for_origin_chain(self.origin_chain_id)?.into();

        if let Some(address) = self.overrides.origin_spoke_pool {
            builder = builder.origin_spoke_pool(address);
        }
        if let Some(address) = self.overrides.multicall_handler {
            builder = builder.multicall_handler(address);
        }
        if let Some(address) = self.overrides.destination_spoke_pool {
            builder = builder.destination_spoke_pool(address);
        }

        let network = builder.build();
        network.validate()?;

        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const MINIMAL: &str = r#"
        origin_rpc_url = "http://localhost:8545"
        destination_rpc_url = "http://localhost:8546"
    "#;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();

        assert_eq!(config.quote_api_url, ACROSS_API_URL);
        assert_eq!(config.origin_chain_id, 10);
        assert_eq!(config.lookback_secs, 43_200);
        assert!(!config.dry_run);
        assert!(config.wallet_rpc_url.is_none());
        assert!(config.metrics_port.is_none());
        assert_eq!(config.network_config().unwrap(), NetworkConfig::mainnet());
    }

    #[test]
    fn test_overrides_applied() {
        let config: Config = toml::from_str(&format!(
            r#"{MINIMAL}
            [overrides]
            multicall_handler = "0x1111111111111111111111111111111111111111"
            "#
        ))
        .unwrap();

        let network = config.network_config().unwrap();
        assert_eq!(
            network.destination.multicall_handler,
            address!("1111111111111111111111111111111111111111")
        );
        assert_eq!(network.origin, NetworkConfig::mainnet().origin);
    }

    #[test]
    fn test_zero_override_rejected() {
        let config: Config = toml::from_str(&format!(
            r#"{MINIMAL}
            [overrides]
            origin_spoke_pool = "0x0000000000000000000000000000000000000000"
            "#
        ))
        .unwrap();

        assert!(matches!(
            config.network_config(),
            Err(ConfigError::ZeroAddress("origin.spoke_pool"))
        ));
    }

    #[test]
    fn test_unsupported_origin_chain() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.origin_chain_id = 8453;

        assert!(matches!(
            config.network_config(),
            Err(ConfigError::UnsupportedChain(8453))
        ));
    }
}
