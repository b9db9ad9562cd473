//! Top-level query routine and result rendering

use crate::{
	chain::{
		client::ChainClient,
		storage::{self, ChainSnapshot},
		types::TypeDefinitions,
	},
	config::QueryConfig,
	error::{QueryError, Result},
	log_print, log_verbose,
};
use colored::Colorize;

/// Load type definitions, connect and read the snapshot.
///
/// The type definitions are loaded before any network activity. Connecting and
/// querying together are bounded by `config.timeout`.
pub async fn run(config: &QueryConfig) -> Result<ChainSnapshot> {
	log_verbose!("📄 Loading type definitions from {}", config.types_path.display());
	let types = TypeDefinitions::load(&config.types_path)?;

	match tokio::time::timeout(config.timeout, query(config, types)).await {
		Ok(result) => result,
		Err(_) => Err(QueryError::Timeout(config.timeout)),
	}
}

async fn query(config: &QueryConfig, types: TypeDefinitions) -> Result<ChainSnapshot> {
	let client = ChainClient::connect(config, types).await?;

	if crate::log::is_verbose() {
		let (spec_version, transaction_version) = client.runtime_version();
		let chain = chain_label(client.chain_name().await);
		log_verbose!(
			"🔧 {} at {}: spec {}, tx {}",
			chain.bright_cyan(),
			client.node_url(),
			spec_version.to_string().bright_green(),
			transaction_version.to_string().bright_yellow()
		);
	}

	storage::fetch_snapshot(&client).await
}

/// Chain name for diagnostics. A failed lookup never fails the run.
fn chain_label(name: Result<String>) -> String {
	match name {
		Ok(chain) => chain,
		Err(e) => {
			log_verbose!("⚠️  Could not read the chain name: {}", e);
			"unknown chain".to_string()
		},
	}
}

/// The three result lines, in fixed order
pub fn render_snapshot(snapshot: &ChainSnapshot) -> Vec<String> {
	vec![
		format!("timestamp.now {}", snapshot.now),
		format!("transactionPayment.nextFeeMultiplier is {}", snapshot.next_fee_multiplier),
		format!("transactionPayment.storageVersion is {}", snapshot.storage_version),
	]
}

pub fn print_snapshot(snapshot: &ChainSnapshot) {
	for line in render_snapshot(snapshot) {
		log_print!("{}", line);
	}
}

pub fn print_snapshot_json(snapshot: &ChainSnapshot) -> Result<()> {
	log_print!("{}", serde_json::to_string_pretty(snapshot)?);
	Ok(())
}
