//! Resilience helpers.
//!
//! # Design Decisions
//! - Every external call has a deadline (see `blockchain::client`)
//! - Receipt polling waits between attempts instead of spinning

pub mod backoff;
