/// Chain interaction module
///
/// This module provides functionality for:
/// - Connecting to a Substrate node over WebSocket
/// - Loading custom type definitions
/// - Querying chain state
pub mod client;
pub mod storage;
pub mod types;
