//! Tool trait and execution context

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use stepwise_protocol::{JsonSchema, ToolOutput, ToolSpec};

use crate::ToolError;

/// Context passed to tool execution
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// JSON-RPC id of the call being served, for log correlation
    pub request_id: Option<String>,
}

impl ToolContext {
    pub fn for_request(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }
}

/// The core Tool trait for implementing tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the JSON schema for input validation
    fn schema(&self) -> JsonSchema;

    /// Execute the tool with the given input
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;

    /// Specification advertised to clients
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(self.name(), self.description(), self.schema())
    }
}

/// A boxed tool for dynamic dispatch
pub type BoxedTool = Arc<dyn Tool>;
