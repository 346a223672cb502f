//! Token and fee tier types.

use alloy::primitives::utils::{parse_units, ParseUnits, UnitsError};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Why a human-readable amount could not be used.
#[derive(Debug, Error)]
pub enum AmountError {
    #[error("invalid amount: {0}")]
    Units(#[from] UnitsError),

    #[error("amount must not be negative: {0}")]
    Negative(String),
}

/// An ERC-20 token on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: Cow<'static, str>,
    #[serde(default)]
    pub name: Cow<'static, str>,
}

impl Token {
    /// Convert a human-readable amount ("1000", "0.5") into base units.
    pub fn parse_amount(&self, amount: &str) -> Result<U256, AmountError> {
        let amount = amount.trim();
        match parse_units(amount, self.decimals)? {
            ParseUnits::U256(value) => Ok(value),
            ParseUnits::I256(_) => Err(AmountError::Negative(amount.to_string())),
        }
    }

    /// Same token on the same chain (metadata ignored).
    pub fn same_as(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

/// Pool fee tier, in hundredths of a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeAmount {
    Lowest,
    Low,
    #[default]
    Medium,
    High,
}

impl FeeAmount {
    pub const fn fee(self) -> u32 {
        match self {
            FeeAmount::Lowest => 100,
            FeeAmount::Low => 500,
            FeeAmount::Medium => 3000,
            FeeAmount::High => 10_000,
        }
    }

    /// Tick spacing the exchange assigns to this tier.
    pub const fn tick_spacing(self) -> i32 {
        match self {
            FeeAmount::Lowest => 1,
            FeeAmount::Low => 10,
            FeeAmount::Medium => 60,
            FeeAmount::High => 200,
        }
    }
}

impl From<FeeAmount> for u32 {
    fn from(fee: FeeAmount) -> Self {
        fee.fee()
    }
}

impl TryFrom<u32> for FeeAmount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(FeeAmount::Lowest),
            500 => Ok(FeeAmount::Low),
            3000 => Ok(FeeAmount::Medium),
            10_000 => Ok(FeeAmount::High),
            other => Err(format!("unsupported fee tier {}", other)),
        }
    }
}
