//! # Substrate Query Library
//!
//! Reads the current timestamp, the next fee multiplier and the transaction
//! payment storage version from a Substrate node. The binary is a thin wrapper
//! around [`cli::run`].

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;

// Re-export commonly used types and functions
pub use chain::storage::{ChainSnapshot, Multiplier, StorageVersion};
pub use config::QueryConfig;
pub use error::{QueryError, QueryError as Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library version
pub fn version() -> &'static str {
	VERSION
}

/// Get the library name
pub fn name() -> &'static str {
	NAME
}
