//! Configuration management module
//!
//! The configuration is resolved once at startup from the environment (and an
//! optional `.env` file), then overridden by command line flags and passed
//! down explicitly.

use crate::error::{QueryError, Result};
use std::{path::PathBuf, time::Duration};

/// Node endpoint used when `ws_url` is not set
pub const DEFAULT_NODE_URL: &str = "ws://localhost:9944";

/// Type definitions file used when `types` is not set
pub const DEFAULT_TYPES_PATH: &str = "../pallets/types.json";

/// Upper bound for connecting and running all queries
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const NODE_URL_VAR: &str = "ws_url";
pub const TYPES_PATH_VAR: &str = "types";
pub const TIMEOUT_VAR: &str = "QUERY_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
	pub node_url: String,
	pub types_path: PathBuf,
	pub timeout: Duration,
}

impl Default for QueryConfig {
	fn default() -> Self {
		Self::resolve(None, None, None)
	}
}

impl QueryConfig {
	/// Fill in defaults for every value that was not provided
	pub fn resolve(
		node_url: Option<String>,
		types_path: Option<PathBuf>,
		timeout_secs: Option<u64>,
	) -> Self {
		Self {
			node_url: node_url.unwrap_or_else(|| DEFAULT_NODE_URL.to_string()),
			types_path: types_path.unwrap_or_else(|| PathBuf::from(DEFAULT_TYPES_PATH)),
			timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
		}
	}

	/// Resolve from an arbitrary variable lookup. Empty values count as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

		let timeout_secs = match get(TIMEOUT_VAR) {
			Some(raw) => {
				let secs = raw.trim().parse::<u64>().map_err(|e| {
					QueryError::Config(format!(
						"{TIMEOUT_VAR}='{raw}' is not a number of seconds: {e}"
					))
				})?;
				Some(validate_timeout(TIMEOUT_VAR, secs)?)
			},
			None => None,
		};

		let config =
			Self::resolve(get(NODE_URL_VAR), get(TYPES_PATH_VAR).map(PathBuf::from), timeout_secs);
		::log::debug!("Resolved configuration: {config:?}");
		Ok(config)
	}

	/// Resolve from the process environment
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Apply command line flags on top of the resolved values
	pub fn with_overrides(
		mut self,
		node_url: Option<String>,
		types_path: Option<PathBuf>,
		timeout_secs: Option<u64>,
	) -> Result<Self> {
		if let Some(node_url) = node_url {
			self.node_url = node_url;
		}
		if let Some(types_path) = types_path {
			self.types_path = types_path;
		}
		if let Some(secs) = timeout_secs {
			self.timeout = Duration::from_secs(validate_timeout("--timeout", secs)?);
		}
		Ok(self)
	}
}

/// A zero timeout would expire before the first request is sent
fn validate_timeout(source: &str, secs: u64) -> Result<u64> {
	if secs == 0 {
		return Err(QueryError::Config(format!("{source} must be at least 1 second")));
	}
	Ok(secs)
}
