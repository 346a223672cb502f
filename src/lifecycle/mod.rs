//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! signals.rs: SIGTERM/SIGINT → Shutdown::trigger
//! shutdown.rs: broadcast → every in-flight confirmation wait returns Failed
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
