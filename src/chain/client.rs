//! Client construction shared by all queries
//!
//! Connects a jsonrpsee WebSocket client, hands it to SubXT and keeps the
//! custom type definitions alongside.

use crate::{
	chain::types::TypeDefinitions, config::QueryConfig, error::QueryError, log_verbose,
};
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use std::{sync::Arc, time::Duration};
use subxt::{backend::rpc::RpcClient, OnlineClient, SubstrateConfig};

/// Added to the configured timeout for jsonrpsee's connection and request timeouts
const TRANSPORT_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Wrapper around OnlineClient that also stores the node URL, RPC client and type definitions
pub struct ChainClient {
	client: OnlineClient<SubstrateConfig>,
	rpc_client: Arc<WsClient>,
	node_url: String,
	types: TypeDefinitions,
}

impl ChainClient {
	/// Connect to the node named in `config`
	pub async fn connect(config: &QueryConfig, types: TypeDefinitions) -> crate::error::Result<Self> {
		log_verbose!("🔗 Connecting to node: {}", config.node_url);

		// The caller's overall deadline must expire before the transport's own timeouts
		let transport_timeout = config.timeout + TRANSPORT_TIMEOUT_GRACE;
		let ws_client = WsClientBuilder::default()
			.connection_timeout(transport_timeout)
			.request_timeout(transport_timeout)
			.build(&config.node_url)
			.await
			.map_err(|e| QueryError::NetworkError(format!("Failed to create RPC client: {e:?}")))?;

		let ws_client = Arc::new(ws_client);
		let rpc_client = RpcClient::new(ws_client.clone());

		let client = OnlineClient::<SubstrateConfig>::from_rpc_client(rpc_client)
			.await
			.map_err(|e| QueryError::NetworkError(format!("Failed to connect: {e:?}")))?;

		log_verbose!("✅ Connected to {}", config.node_url);
		log_verbose!("📚 Using {} custom type definitions", types.len());
		::log::debug!("Custom types: {:?}", types.names().collect::<Vec<_>>());

		Ok(Self { client, rpc_client: ws_client, node_url: config.node_url.clone(), types })
	}

	/// Get reference to the underlying SubXT client
	pub fn client(&self) -> &OnlineClient<SubstrateConfig> {
		&self.client
	}

	/// Get reference to the RPC client
	pub fn rpc_client(&self) -> &WsClient {
		&self.rpc_client
	}

	pub fn node_url(&self) -> &str {
		&self.node_url
	}

	pub fn types(&self) -> &TypeDefinitions {
		&self.types
	}

	/// Runtime spec and transaction versions the client was built against
	pub fn runtime_version(&self) -> (u32, u32) {
		let version = self.client.runtime_version();
		(version.spec_version, version.transaction_version)
	}

	/// Chain name reported by the node (`system_chain`)
	pub async fn chain_name(&self) -> crate::error::Result<String> {
		use jsonrpsee::core::client::ClientT;
		self.rpc_client
			.request::<String, [(); 0]>("system_chain", [])
			.await
			.map_err(|e| QueryError::NetworkError(format!("Failed to fetch chain name: {e:?}")))
	}

	/// Whether the runtime metadata declares `pallet::entry`
	pub fn has_storage_entry(&self, pallet: &str, entry: &str) -> bool {
		self.client
			.metadata()
			.pallet_by_name(pallet)
			.and_then(|p| p.storage().and_then(|s| s.entry_by_name(entry)).map(|_| ()))
			.is_some()
	}
}
