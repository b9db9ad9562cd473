//! Storage reads for the Timestamp and TransactionPayment pallets
//!
//! Values are fetched through dynamic storage addresses and decoded with the
//! runtime metadata, then narrowed to the shapes printed by the CLI.

use crate::{
	chain::client::ChainClient,
	error::{QueryError, Result},
	log_verbose,
};
use codec::DecodeAll;
use scale_value::{Primitive, Value, ValueDef};
use serde::Serialize;
use sp_core::twox_128;
use std::fmt;

pub const TIMESTAMP_PALLET: &str = "Timestamp";
pub const TRANSACTION_PAYMENT_PALLET: &str = "TransactionPayment";

const STORAGE_VERSION_KEY_POSTFIX: &[u8] = b":__STORAGE_VERSION__:";

/// Accuracy of `FixedU128` (18 decimal places)
pub const MULTIPLIER_ACCURACY: u128 = 1_000_000_000_000_000_000;

/// Fee multiplier as stored on chain: a `FixedU128` inner value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Multiplier(pub u128);

impl Multiplier {
	/// Render as a decimal number, e.g. `1.000000000000000000`
	pub fn to_decimal_string(&self) -> String {
		format!("{}.{:018}", self.0 / MULTIPLIER_ACCURACY, self.0 % MULTIPLIER_ACCURACY)
	}
}

impl fmt::Display for Multiplier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Storage version of the transaction payment pallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StorageVersion {
	/// Variant of the pallet's own `Releases` enum (`V1Ancient`, `V2`)
	Release(String),
	/// Generic FRAME pallet storage version
	Pallet(u16),
}

impl fmt::Display for StorageVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StorageVersion::Release(name) => f.write_str(name),
			StorageVersion::Pallet(version) => write!(f, "{version}"),
		}
	}
}

/// The three values read in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSnapshot {
	pub now: u64,
	pub next_fee_multiplier: Multiplier,
	pub storage_version: StorageVersion,
}

/// Fetch a plain storage value at the latest block, falling back to its default
async fn fetch_value(client: &ChainClient, pallet: &str, entry: &str) -> Result<Value<u32>> {
	let item = format!("{pallet}::{entry}");
	let address = subxt::dynamic::storage(pallet, entry, ());

	let storage_at = client
		.client()
		.storage()
		.at_latest()
		.await
		.map_err(|e| QueryError::storage(&item, e))?;

	let thunk = storage_at
		.fetch_or_default(&address)
		.await
		.map_err(|e| QueryError::storage(&item, e))?;

	thunk.to_value().map_err(|e| QueryError::decode(&item, format!("{e:?}")))
}

/// `Timestamp::Now`, milliseconds since the Unix epoch
pub async fn fetch_timestamp(client: &ChainClient) -> Result<u64> {
	log_verbose!("⏱️  Querying Timestamp::Now ({})", client.types().resolve_alias("Moment"));
	let value = fetch_value(client, TIMESTAMP_PALLET, "Now").await?;
	decode_timestamp(&value)
}

/// `TransactionPayment::NextFeeMultiplier`
pub async fn fetch_next_fee_multiplier(client: &ChainClient) -> Result<Multiplier> {
	log_verbose!(
		"💸 Querying TransactionPayment::NextFeeMultiplier ({})",
		client.types().resolve_alias("Multiplier")
	);
	let value = fetch_value(client, TRANSACTION_PAYMENT_PALLET, "NextFeeMultiplier").await?;
	let multiplier = decode_multiplier(&value)?;
	log_verbose!("   = {}", multiplier.to_decimal_string());
	Ok(multiplier)
}

/// `TransactionPayment::StorageVersion`, or the pallet storage version on
/// runtimes that dropped the `Releases` entry
pub async fn fetch_storage_version(client: &ChainClient) -> Result<StorageVersion> {
	if client.has_storage_entry(TRANSACTION_PAYMENT_PALLET, "StorageVersion") {
		log_verbose!(
			"🏷️  Querying TransactionPayment::StorageVersion ({})",
			client.types().resolve_alias("Releases")
		);
		let value = fetch_value(client, TRANSACTION_PAYMENT_PALLET, "StorageVersion").await?;
		return decode_release(&value);
	}

	log_verbose!("🏷️  No StorageVersion entry in metadata, reading the pallet storage version");
	let version = fetch_pallet_storage_version(client, TRANSACTION_PAYMENT_PALLET).await?;
	Ok(StorageVersion::Pallet(version))
}

/// Read the `:__STORAGE_VERSION__:` value every FRAME pallet keeps
pub async fn fetch_pallet_storage_version(client: &ChainClient, pallet: &str) -> Result<u16> {
	let item = format!("{pallet}::{}", String::from_utf8_lossy(STORAGE_VERSION_KEY_POSTFIX));
	let key = pallet_storage_version_key(pallet);

	let storage_at = client
		.client()
		.storage()
		.at_latest()
		.await
		.map_err(|e| QueryError::storage(&item, e))?;

	let raw = storage_at.fetch_raw(key).await.map_err(|e| QueryError::storage(&item, e))?;
	if let Some(bytes) = &raw {
		log_verbose!("   raw value: 0x{}", hex::encode(bytes));
	}

	decode_pallet_storage_version(&item, raw.as_deref())
}

/// Query all three values in order. Any failure aborts the whole snapshot.
pub async fn fetch_snapshot(client: &ChainClient) -> Result<ChainSnapshot> {
	let now = fetch_timestamp(client).await?;
	let next_fee_multiplier = fetch_next_fee_multiplier(client).await?;
	let storage_version = fetch_storage_version(client).await?;

	Ok(ChainSnapshot { now, next_fee_multiplier, storage_version })
}

pub fn pallet_storage_version_key(pallet: &str) -> Vec<u8> {
	let mut key = twox_128(pallet.as_bytes()).to_vec();
	key.extend(&twox_128(STORAGE_VERSION_KEY_POSTFIX));
	key
}

/// Unwrap an unsigned integer, looking through single-field wrappers such as `FixedU128`
pub fn value_as_u128<T>(value: &Value<T>) -> Option<u128> {
	match &value.value {
		ValueDef::Primitive(Primitive::U128(n)) => Some(*n),
		ValueDef::Composite(composite) => {
			let mut values = composite.values();
			match (values.next(), values.next()) {
				(Some(inner), None) => value_as_u128(inner),
				_ => None,
			}
		},
		_ => None,
	}
}

pub fn decode_timestamp<T>(value: &Value<T>) -> Result<u64> {
	let raw = value_as_u128(value)
		.ok_or_else(|| QueryError::decode("Timestamp::Now", "expected an unsigned integer"))?;
	u64::try_from(raw)
		.map_err(|_| QueryError::decode("Timestamp::Now", format!("{raw} does not fit in u64")))
}

pub fn decode_multiplier<T>(value: &Value<T>) -> Result<Multiplier> {
	value_as_u128(value).map(Multiplier).ok_or_else(|| {
		QueryError::decode("TransactionPayment::NextFeeMultiplier", "expected a fixed-point number")
	})
}

pub fn decode_release<T>(value: &Value<T>) -> Result<StorageVersion> {
	match &value.value {
		ValueDef::Variant(variant) => Ok(StorageVersion::Release(variant.name.clone())),
		_ => Err(QueryError::decode(
			"TransactionPayment::StorageVersion",
			"expected an enum variant",
		)),
	}
}

/// Missing value means version 0, as FRAME reads it. Trailing bytes are an error.
pub fn decode_pallet_storage_version(item: &str, raw: Option<&[u8]>) -> Result<u16> {
	match raw {
		None => Ok(0),
		Some(mut bytes) =>
			u16::decode_all(&mut bytes).map_err(|e| QueryError::decode(item, e.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_multiplier_display_is_raw_inner_value() {
		let multiplier = Multiplier(MULTIPLIER_ACCURACY);
		assert_eq!(multiplier.to_string(), "1000000000000000000");
		assert_eq!(multiplier.to_decimal_string(), "1.000000000000000000");
	}

	#[test]
	fn test_multiplier_decimal_string_fraction() {
		let multiplier = Multiplier(MULTIPLIER_ACCURACY / 4 + 2 * MULTIPLIER_ACCURACY);
		assert_eq!(multiplier.to_decimal_string(), "2.250000000000000000");
		assert_eq!(Multiplier(1).to_decimal_string(), "0.000000000000000001");
	}

	#[test]
	fn test_storage_version_display() {
		assert_eq!(StorageVersion::Release("V2".into()).to_string(), "V2");
		assert_eq!(StorageVersion::Pallet(4).to_string(), "4");
	}

	#[test]
	fn test_decode_timestamp() {
		assert_eq!(decode_timestamp(&Value::u128(1_700_000_000_000)).unwrap(), 1_700_000_000_000);
		assert!(matches!(
			decode_timestamp(&Value::u128(u128::from(u64::MAX) + 1)),
			Err(QueryError::Decode { .. })
		));
		assert!(matches!(decode_timestamp(&Value::bool(true)), Err(QueryError::Decode { .. })));
	}

	#[test]
	fn test_decode_multiplier_through_wrapper() {
		let fixed = Value::unnamed_composite(vec![Value::u128(MULTIPLIER_ACCURACY)]);
		assert_eq!(decode_multiplier(&fixed).unwrap(), Multiplier(MULTIPLIER_ACCURACY));

		let two_fields = Value::unnamed_composite(vec![Value::u128(1), Value::u128(2)]);
		assert!(decode_multiplier(&two_fields).is_err());
	}

	#[test]
	fn test_decode_release_variant() {
		let value = Value::unnamed_variant("V2", Vec::<Value>::new());
		assert_eq!(decode_release(&value).unwrap(), StorageVersion::Release("V2".into()));
		assert!(decode_release(&Value::u128(2)).is_err());
	}

	#[test]
	fn test_decode_pallet_storage_version() {
		let item = "TransactionPayment::version";
		assert_eq!(decode_pallet_storage_version(item, None).unwrap(), 0);
		assert_eq!(decode_pallet_storage_version(item, Some(&[2u8, 0][..])).unwrap(), 2);
		assert!(decode_pallet_storage_version(item, Some(&[1u8][..])).is_err());
		assert!(matches!(
			decode_pallet_storage_version(item, Some(&[2u8, 0, 0][..])),
			Err(QueryError::Decode { .. })
		));
	}

	#[test]
	fn test_pallet_storage_version_key_layout() {
		let key = pallet_storage_version_key(TRANSACTION_PAYMENT_PALLET);
		assert_eq!(key.len(), 32);
		assert_eq!(&key[..16], &twox_128(b"TransactionPayment"));
		assert_eq!(&key[16..], &twox_128(b":__STORAGE_VERSION__:"));
	}

	#[test]
	fn test_snapshot_serializes_for_json_output() {
		let snapshot = ChainSnapshot {
			now: 42,
			next_fee_multiplier: Multiplier(MULTIPLIER_ACCURACY),
			storage_version: StorageVersion::Release("V2".into()),
		};
		let json = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(json["now"], 42);
		assert_eq!(json["storage_version"], "V2");
		assert_eq!(json["next_fee_multiplier"].to_string(), "1000000000000000000");
	}
}
