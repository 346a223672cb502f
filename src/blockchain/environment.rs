//! Deployment target selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where transactions are sent and who signs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Mainnet RPC, local private-key wallet.
    Production,
    /// Local fork node (e.g. Anvil), local private-key wallet.
    #[default]
    Local,
    /// Wallet extension endpoint; signing happens on the extension side.
    BrowserExtension,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Local => "local",
            Environment::BrowserExtension => "browser_extension",
        }
    }

    /// Whether the signer lives in this process.
    pub fn uses_local_wallet(&self) -> bool {
        !matches!(self, Environment::BrowserExtension)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "production" | "mainnet" => Ok(Environment::Production),
            "local" => Ok(Environment::Local),
            "browser_extension" | "wallet_extension" => Ok(Environment::BrowserExtension),
            other => Err(format!(
                "unknown environment '{}' (expected production, local or browser-extension)",
                other
            )),
        }
    }
}
