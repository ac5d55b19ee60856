//! Stdio MCP server for the sequential thinking tool

pub mod cli;
pub mod server;
pub mod transport;

pub use cli::Cli;
pub use server::{McpServer, PROTOCOL_VERSION};
pub use transport::serve;
