//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sane poll intervals)
//! - Check that endpoints parse as URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "rpc.mainnet", &config.rpc.mainnet);
    check_url(&mut errors, "rpc.local", &config.rpc.local);
    if let Some(url) = &config.rpc.wallet_extension {
        check_url(&mut errors, "rpc.wallet_extension", url);
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }

    let tracker = &config.tracker;
    if tracker.poll_interval_ms == 0 {
        errors.push(ValidationError::new("tracker.poll_interval_ms", "must be greater than 0"));
    }
    if tracker.max_poll_interval_ms < tracker.poll_interval_ms {
        errors.push(ValidationError::new(
            "tracker.max_poll_interval_ms",
            "must not be smaller than poll_interval_ms",
        ));
    }
    if tracker.max_attempts == Some(0) {
        errors.push(ValidationError::new("tracker.max_attempts", "must be greater than 0"));
    }
    if tracker.timeout_secs == Some(0) {
        errors.push(ValidationError::new("tracker.timeout_secs", "must be greater than 0"));
    }

    let trade = &config.tokens;
    if trade.token_in.chain_id != trade.token_out.chain_id {
        errors.push(ValidationError::new("tokens", "in and out tokens are on different chains"));
    }
    if trade.token_in.same_as(&trade.token_out) {
        errors.push(ValidationError::new("tokens", "in and out tokens must differ"));
    }
    if let Err(e) = trade.amount_in_base_units() {
        errors.push(ValidationError::new("tokens.amount_in", e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}
