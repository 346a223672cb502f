//! Example token definitions and pool fee tiers.
//!
//! Static inputs for the exchange examples. No pricing math lives here;
//! quotes and pool state come from the exchange SDK.

pub mod constants;
pub mod types;

pub use constants::{USDC_TOKEN, WETH_TOKEN};
pub use types::{AmountError, FeeAmount, Token};
