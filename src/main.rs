/*!
 * substrate-query - read on-chain time and fee state from a Substrate node
 *
 * Connects over WebSocket, loads the custom type definitions and prints
 * `Timestamp::Now`, `TransactionPayment::NextFeeMultiplier` and the
 * transaction payment storage version.
 */

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use substrate_query::{
	cli, config::QueryConfig, error::QueryError, log_error, log_verbose,
};

#[derive(Parser)]
#[command(name = "substrate-query")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read timestamp and transaction payment storage from a Substrate node", long_about = None)]
struct Cli {
	/// Node endpoint URL [env: ws_url] [default: ws://localhost:9944]
	#[arg(long)]
	ws_url: Option<String>,

	/// Path to the custom type definitions JSON [env: types] [default: ../pallets/types.json]
	#[arg(long)]
	types: Option<PathBuf>,

	/// Seconds allowed for connecting and querying [env: QUERY_TIMEOUT] [default: 30]
	#[arg(long)]
	timeout: Option<u64>,

	/// Print the values as a JSON object instead of text lines
	#[arg(long)]
	json: bool,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), QueryError> {
	dotenv::dotenv().ok();
	let cli = Cli::parse();

	substrate_query::log::set_verbose(cli.verbose);
	env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
	)
	.init();

	log_verbose!("{}", "🔎 substrate-query".bright_cyan().bold());

	let start_time = std::time::Instant::now();
	let result = execute(cli).await;
	let elapsed = start_time.elapsed();

	match result {
		Ok(()) => {
			log_verbose!("⏱️  Completed in {:.2}s", elapsed.as_secs_f64());
			Ok(())
		},
		Err(e) => {
			log_error!("{}", e);
			log_verbose!("⏱️  Failed after {:.2}s", elapsed.as_secs_f64());
			std::process::exit(1);
		},
	}
}

async fn execute(cli: Cli) -> substrate_query::Result<()> {
	let config = QueryConfig::from_env()?.with_overrides(cli.ws_url, cli.types, cli.timeout)?;
	let snapshot = cli::run(&config).await?;

	if cli.json {
		cli::print_snapshot_json(&snapshot)
	} else {
		cli::print_snapshot(&snapshot);
		Ok(())
	}
}
