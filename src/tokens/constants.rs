//! Well-known mainnet tokens.

use alloy::primitives::address;
use std::borrow::Cow;

use crate::tokens::types::Token;

pub const MAINNET_CHAIN_ID: u64 = 1;

pub const WETH_TOKEN: Token = Token {
    chain_id: MAINNET_CHAIN_ID,
    address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
    decimals: 18,
    symbol: Cow::Borrowed("WETH"),
    name: Cow::Borrowed("Wrapped Ether"),
};

pub const USDC_TOKEN: Token = Token {
    chain_id: MAINNET_CHAIN_ID,
    address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    decimals: 6,
    symbol: Cow::Borrowed("USDC"),
    name: Cow::Borrowed("USD//C"),
};

/// Look up one of the bundled tokens by symbol (case-insensitive).
pub fn by_symbol(symbol: &str) -> Option<Token> {
    [WETH_TOKEN, USDC_TOKEN]
        .into_iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}
