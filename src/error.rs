//! Error types for the query tool

use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Everything that can go wrong between reading the configuration and printing results
#[derive(Debug, Error)]
pub enum QueryError {
	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("Failed to read type definitions from {}: {source}", .path.display())]
	TypesFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse type definitions in {}: {source}", .path.display())]
	TypesParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Invalid type definitions: {0}")]
	InvalidTypes(String),

	#[error("Network error: {0}")]
	NetworkError(String),

	#[error("Storage query failed for {item}: {reason}")]
	Storage { item: String, reason: String },

	#[error("Failed to decode {item}: {reason}")]
	Decode { item: String, reason: String },

	#[error("Timed out after {:.1}s", .0.as_secs_f64())]
	Timeout(Duration),

	#[error("SubXT error: {0}")]
	Subxt(#[from] subxt::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl QueryError {
	pub(crate) fn storage(item: &str, reason: impl std::fmt::Debug) -> Self {
		QueryError::Storage { item: item.to_string(), reason: format!("{reason:?}") }
	}

	pub(crate) fn decode(item: &str, reason: impl Into<String>) -> Self {
		QueryError::Decode { item: item.to_string(), reason: reason.into() }
	}
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_types_file_error_names_path() {
		let err = QueryError::TypesFile {
			path: PathBuf::from("../pallets/types.json"),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
		};
		let message = err.to_string();
		assert!(message.contains("../pallets/types.json"));
		assert!(message.contains("missing"));
	}

	#[test]
	fn test_timeout_message() {
		let err = QueryError::Timeout(Duration::from_millis(1500));
		assert_eq!(err.to_string(), "Timed out after 1.5s");
	}

	#[test]
	fn test_storage_helper_formats_reason() {
		let err = QueryError::storage("Timestamp::Now", "boom");
		assert_eq!(err.to_string(), "Storage query failed for Timestamp::Now: \"boom\"");
	}
}
