//! Custom type definitions loaded from a JSON document
//!
//! The document maps type names to definitions, e.g.
//! `{ "Address": "AccountId", "AccountRole": "u8", "Account": { "roles": "AccountRole" } }`.
//! It is kept as parsed and handed to the client unmodified.

use crate::error::{QueryError, Result};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDefinitions {
	definitions: Map<String, Value>,
}

impl TypeDefinitions {
	/// Read and parse a type definitions file
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path)
			.map_err(|source| QueryError::TypesFile { path: path.to_path_buf(), source })?;
		let value: Value = serde_json::from_str(&contents)
			.map_err(|source| QueryError::TypesParse { path: path.to_path_buf(), source })?;
		Self::from_value(value)
	}

	pub fn from_json_str(json: &str) -> Result<Self> {
		Self::from_value(serde_json::from_str(json)?)
	}

	fn from_value(value: Value) -> Result<Self> {
		match value {
			Value::Object(definitions) => Ok(Self { definitions }),
			other => Err(QueryError::InvalidTypes(format!(
				"expected a JSON object at the top level, found {}",
				json_kind(&other)
			))),
		}
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.definitions.keys().map(String::as_str)
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.definitions.get(name)
	}

	pub fn as_json(&self) -> &Map<String, Value> {
		&self.definitions
	}

	/// Follow string aliases (`"Address": "AccountId"`) to the final name.
	///
	/// Stops at the first name that is unknown or not defined as a plain string.
	/// Cyclic aliases stop after visiting every definition once.
	pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
		let mut current = name;
		for _ in 0..self.definitions.len() {
			match self.definitions.get(current) {
				Some(Value::String(next)) if next.as_str() != current => current = next.as_str(),
				_ => break,
			}
		}
		current
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const TEMPLATE_TYPES: &str = r#"{
		"Address": "AccountId",
		"LookupSource": "AccountId",
		"AccountRole": "u8",
		"Account": { "roles": "AccountRole", "create_time": "Moment" }
	}"#;

	#[test]
	fn test_parse_template_types() {
		let types = TypeDefinitions::from_json_str(TEMPLATE_TYPES).unwrap();
		assert_eq!(types.len(), 4);
		assert!(!types.is_empty());
		assert_eq!(types.get("AccountRole"), Some(&Value::String("u8".into())));
		let mut names: Vec<_> = types.names().collect();
		names.sort_unstable();
		assert_eq!(names, vec!["Account", "AccountRole", "Address", "LookupSource"]);
	}

	#[test]
	fn test_empty_object_is_valid() {
		let types = TypeDefinitions::from_json_str("{}").unwrap();
		assert!(types.is_empty());
	}

	#[test]
	fn test_top_level_must_be_object() {
		let err = TypeDefinitions::from_json_str("[1, 2]").unwrap_err();
		assert!(matches!(err, QueryError::InvalidTypes(ref msg) if msg.contains("an array")));
	}

	#[test]
	fn test_resolve_alias_chain() {
		let types = TypeDefinitions::from_json_str(
			r#"{ "Address": "LookupSource", "LookupSource": "AccountId", "Account": {} }"#,
		)
		.unwrap();
		assert_eq!(types.resolve_alias("Address"), "AccountId");
		assert_eq!(types.resolve_alias("Account"), "Account");
		assert_eq!(types.resolve_alias("Moment"), "Moment");
	}

	#[test]
	fn test_resolve_alias_cycle_terminates() {
		let types = TypeDefinitions::from_json_str(r#"{ "A": "B", "B": "A" }"#).unwrap();
		let resolved = types.resolve_alias("A");
		assert!(resolved == "A" || resolved == "B");
	}

	#[test]
	fn test_load_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("types.json");
		let err = TypeDefinitions::load(&path).unwrap_err();
		assert!(matches!(err, QueryError::TypesFile { path: ref p, .. } if p == &path));
	}

	#[test]
	fn test_load_malformed_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{{ \"Address\": ").unwrap();
		let err = TypeDefinitions::load(file.path()).unwrap_err();
		assert!(matches!(err, QueryError::TypesParse { .. }));
	}

	#[test]
	fn test_load_passes_document_through() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{TEMPLATE_TYPES}").unwrap();
		let types = TypeDefinitions::load(file.path()).unwrap();
		let expected: Value = serde_json::from_str(TEMPLATE_TYPES).unwrap();
		assert_eq!(&Value::Object(types.as_json().clone()), &expected);
	}
}
