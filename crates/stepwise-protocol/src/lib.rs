//! Stepwise Protocol - wire types for tools and JSON-RPC
//!
//! Shared by the tool layer and the MCP server:
//! - Tool schemas, specs, and outputs
//! - JSON-RPC 2.0 request/response envelopes

pub mod jsonrpc;
pub mod tools;

pub use jsonrpc::{error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
pub use tools::{JsonSchema, ToolOutput, ToolOutputContent, ToolSpec};
