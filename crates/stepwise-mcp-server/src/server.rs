use serde_json::{json, Value};
use stepwise_config::StepwiseConfig;
use std::fmt::Display;
use stepwise_protocol::{error_codes, JsonRpcRequest, JsonRpcResponse};
use stepwise_thinking::{SequentialThinkingTool, SessionStore, ThinkingTracker};
use stepwise_tools::{ToolContext, ToolError, ToolRouter};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer {
    name: String,
    router: ToolRouter,
}

impl McpServer {
    /// Build a server with every tool registered against a fresh session store
    pub fn from_config(config: &StepwiseConfig) -> Result<Self, ToolError> {
        Self::with_store(config, SessionStore::new())
    }

    pub fn with_store(config: &StepwiseConfig, store: SessionStore) -> Result<Self, ToolError> {
        let tracker = ThinkingTracker::new(store, config.thinking);

        let mut router = ToolRouter::new();
        router.register(SequentialThinkingTool::new(tracker))?;

        Ok(Self {
            name: config.server.name.clone(),
            router,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.router.names()
    }

    /// Answer one request. Notifications are dropped earlier, in [`Self::handle_line`].
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, id = ?request.id, "handling request");

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::result(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "resources/list" => JsonRpcResponse::result(request.id, json!({ "resources": [] })),
            "prompts/list" => JsonRpcResponse::result(request.id, json!({ "prompts": [] })),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle one raw line from the transport. Returns the serialized reply,
    /// or `None` when nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> serde_json::Result<Option<String>> {
        let request = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => request,
            Err(e) => return Self::parse_error_reply(e),
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification");
            return Ok(None);
        }

        let response = self.handle_request(request).await;
        serde_json::to_string(&response).map(Some)
    }

    /// Serialized `-32700` reply for input that never became a request
    pub fn parse_error_reply(detail: impl Display) -> serde_json::Result<Option<String>> {
        tracing::warn!(error = %detail, "unparseable request");
        let response = JsonRpcResponse::error(
            None,
            error_codes::PARSE_ERROR,
            format!("Parse error: {}", detail),
        );
        serde_json::to_string(&response).map(Some)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": self.name,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::result(id, json!({ "tools": self.router.specs() }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params");
        };

        let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let ctx = id
            .as_ref()
            .map(|id| ToolContext::for_request(id.to_string()))
            .unwrap_or_default();

        match self.router.dispatch(tool_name, arguments, &ctx).await {
            Ok(output) => JsonRpcResponse::result(id, json!({ "content": output.content })),
            Err(e) => {
                tracing::debug!(tool = tool_name, error = %e, "tool call failed");
                JsonRpcResponse::result(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": format!("Error: {}", e)
                        }],
                        "isError": true
                    }),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::from_config(&StepwiseConfig::default()).unwrap()
    }

    fn request(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(id)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let resp = server().handle_request(request(1, "initialize", None)).await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "stepwise-mcp");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_contains_sequential_thinking() {
        let resp = server().handle_request(request(2, "tools/list", None)).await;
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], "sequential_thinking");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let resp = server().handle_request(request(3, "tools/call", None)).await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_as_tool_error() {
        let resp = server()
            .handle_request(request(
                4,
                "tools/call",
                Some(json!({"name": "leave_balance", "arguments": {}})),
            ))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error: tool not found: leave_balance"
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = server().handle_request(request(5, "sampling/create", None)).await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
        assert!(error.message.contains("sampling/create"));
    }

    #[tokio::test]
    async fn test_notifications_produce_no_reply() {
        let server = server();
        for line in [
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":4}}"#,
            r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"sequential_thinking"}}"#,
        ] {
            assert!(server.handle_line(line).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_parse_error_reply() {
        let reply = server().handle_line("{not json").await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], error_codes::PARSE_ERROR);
        assert_eq!(value.get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_server_name_from_config() {
        let mut config = StepwiseConfig::default();
        config.server.name = "thinker".to_string();
        let server = McpServer::from_config(&config).unwrap();
        assert_eq!(server.name(), "thinker");
        assert_eq!(server.tool_names(), vec!["sequential_thinking"]);
    }
}
