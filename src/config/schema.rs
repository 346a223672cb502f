//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every section
//! has defaults, so an empty file yields a usable local-fork setup.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::blockchain::Environment;
use crate::config::validation::ValidationError;
use crate::tokens::constants::by_symbol;
use crate::tokens::{AmountError, FeeAmount, Token, USDC_TOKEN, WETH_TOKEN};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment target.
    pub env: Environment,

    /// Node endpoints.
    pub rpc: RpcConfig,

    /// Local signer settings.
    pub wallet: WalletConfig,

    /// Trade inputs for the exchange examples.
    pub tokens: TradeConfig,

    /// Receipt polling policy.
    pub tracker: TrackerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC endpoints, one per environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Mainnet endpoint (production and pricing reads).
    pub mainnet: String,

    /// Local fork endpoint (e.g. Anvil).
    pub local: String,

    /// Endpoint exposed by a wallet extension bridge, if any.
    pub wallet_extension: Option<String>,

    /// RPC request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            mainnet: "https://eth.llamarpc.com".to_string(),
            local: "http://localhost:8545".to_string(),
            wallet_extension: None,
            timeout_secs: 10,
        }
    }
}

/// Local wallet configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Hex private key. Prefer the `DEX_GLUE_PRIVATE_KEY` environment variable.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,

    /// Chain ID used for signing (1 for mainnet and mainnet forks).
    pub chain_id: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            chain_id: 1,
        }
    }
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Swap inputs: which tokens, how much, which pool fee tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TradeConfig {
    #[serde(rename = "in")]
    pub token_in: Token,

    /// Human-readable amount of `token_in`, e.g. "1000".
    pub amount_in: String,

    #[serde(rename = "out")]
    pub token_out: Token,

    pub pool_fee: FeeAmount,
}

impl TradeConfig {
    /// `amount_in` scaled by the input token's decimals.
    pub fn amount_in_base_units(&self) -> Result<U256, AmountError> {
        self.token_in.parse_amount(&self.amount_in)
    }

    /// Replace inputs given on the command line.
    ///
    /// Tokens are looked up by symbol among the bundled ones; the fee is a
    /// raw tier value such as 3000.
    pub fn apply_overrides(
        &mut self,
        token_in: Option<&str>,
        token_out: Option<&str>,
        amount_in: Option<&str>,
        pool_fee: Option<u32>,
    ) -> Result<(), ValidationError> {
        if let Some(symbol) = token_in {
            self.token_in = by_symbol(symbol)
                .ok_or_else(|| ValidationError::new("tokens.in", format!("unknown token '{}'", symbol)))?;
        }
        if let Some(symbol) = token_out {
            self.token_out = by_symbol(symbol)
                .ok_or_else(|| ValidationError::new("tokens.out", format!("unknown token '{}'", symbol)))?;
        }
        if let Some(amount) = amount_in {
            self.amount_in = amount.to_string();
        }
        if let Some(fee) = pool_fee {
            self.pool_fee = FeeAmount::try_from(fee).map_err(|e| ValidationError::new("tokens.pool_fee", e))?;
        }
        Ok(())
    }
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            token_in: USDC_TOKEN,
            amount_in: "1000".to_string(),
            token_out: WETH_TOKEN,
            pool_fee: FeeAmount::Medium,
        }
    }
}

/// Receipt polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Delay before the second poll in milliseconds.
    pub poll_interval_ms: u64,

    /// Cap for the growing delay between polls in milliseconds.
    pub max_poll_interval_ms: u64,

    /// Maximum number of polls. Absent means no limit.
    pub max_attempts: Option<u32>,

    /// Overall wait limit in seconds. Absent means no limit.
    pub timeout_secs: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_poll_interval_ms: 8000,
            max_attempts: Some(120),
            timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.env, Environment::Local);
        assert_eq!(config.rpc.local, "http://localhost:8545");
        assert_eq!(config.tracker.max_attempts, Some(120));
        assert_eq!(config.tokens.pool_fee, FeeAmount::Medium);
        assert!(config.tokens.token_in.same_as(&USDC_TOKEN));
    }

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
            env = "production"

            [rpc]
            mainnet = "https://mainnet.example.org"
            wallet_extension = "http://127.0.0.1:1248"

            [wallet]
            chain_id = 1

            [tokens]
            amount_in = "0.25"
            pool_fee = "low"

            [tokens.in]
            chain_id = 1
            address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
            decimals = 18
            symbol = "WETH"

            [tracker]
            poll_interval_ms = 250
            timeout_secs = 90
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.rpc.wallet_extension.as_deref(), Some("http://127.0.0.1:1248"));
        assert_eq!(config.tokens.token_in.symbol, "WETH");
        assert!(config.tokens.token_out.same_as(&WETH_TOKEN));
        assert_eq!(config.tokens.pool_fee, FeeAmount::Low);
        assert_eq!(
            config.tokens.amount_in_base_units().unwrap(),
            U256::from(250_000_000_000_000_000u64)
        );
        assert_eq!(config.tracker.poll_interval_ms, 250);
        assert_eq!(config.tracker.max_poll_interval_ms, 8000);
        assert_eq!(config.tracker.timeout_secs, Some(90));
    }

    #[test]
    fn test_trade_overrides() {
        let mut trade = TradeConfig::default();
        trade
            .apply_overrides(Some("weth"), Some("USDC"), Some("2"), Some(500))
            .unwrap();
        assert!(trade.token_in.same_as(&WETH_TOKEN));
        assert!(trade.token_out.same_as(&USDC_TOKEN));
        assert_eq!(trade.pool_fee, FeeAmount::Low);
        assert_eq!(
            trade.amount_in_base_units().unwrap(),
            U256::from(2_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_trade_overrides_reject_unknown_values() {
        let mut trade = TradeConfig::default();
        let err = trade.apply_overrides(Some("DAI"), None, None, None).unwrap_err();
        assert_eq!(err.field, "tokens.in");

        let err = trade.apply_overrides(None, None, None, Some(42)).unwrap_err();
        assert_eq!(err.field, "tokens.pool_fee");
        assert_eq!(trade.pool_fee, FeeAmount::Medium);
    }

    #[test]
    fn test_private_key_is_redacted() {
        let wallet = WalletConfig {
            private_key: Some("deadbeef".into()),
            chain_id: 1,
        };
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_private_key_is_never_serialized() {
        let mut config = AppConfig::default();
        config.wallet.private_key = Some("deadbeef".into());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("private_key"));

        let parsed: WalletConfig = toml::from_str("private_key = \"deadbeef\"").unwrap();
        assert_eq!(parsed.private_key.as_deref(), Some("deadbeef"));
    }
}
