use async_trait::async_trait;
use serde_json::Value;
use stepwise_protocol::{JsonSchema, ToolOutput};
use stepwise_tools::{Tool, ToolContext, ToolError};

use crate::reflection::ReflectionStrategy;
use crate::tracker::ThinkingTracker;
use crate::types::ThoughtRequest;

pub const SEQUENTIAL_THINKING: &str = "sequential_thinking";

/// `sequential_thinking` tool backed by a [`ThinkingTracker`]
pub struct SequentialThinkingTool {
    tracker: ThinkingTracker,
}

impl SequentialThinkingTool {
    pub fn new(tracker: ThinkingTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &ThinkingTracker {
        &self.tracker
    }
}

#[async_trait]
impl Tool for SequentialThinkingTool {
    fn name(&self) -> &str {
        SEQUENTIAL_THINKING
    }

    fn description(&self) -> &str {
        "Facilitates a step-by-step thinking process for problem-solving. Each call records one \
         thought in a session; thoughts can revise earlier ones or branch off into alternatives. \
         Omit sessionId on the first call and reuse the id from the returned summary afterwards. \
         Set reflectionNeeded with a reflectionStrategy and performanceFeedback to log a \
         self-reflection; feedback containing \"incorrect\" revises the thought in place. \
         Returns a summary of the session or an error message."
    }

    fn schema(&self) -> JsonSchema {
        JsonSchema::object()
            .property(
                "thought",
                JsonSchema::string().description("The current thinking step"),
            )
            .property(
                "nextThoughtNeeded",
                JsonSchema::boolean().description("Whether another thought step is needed"),
            )
            .property(
                "thoughtNumber",
                JsonSchema::integer()
                    .minimum(1)
                    .description("Current thought number"),
            )
            .property(
                "totalThoughts",
                JsonSchema::integer()
                    .minimum(1)
                    .description("Estimated total thoughts needed"),
            )
            .property(
                "sessionId",
                JsonSchema::string()
                    .description("Identifier of the thinking session; minted when omitted"),
            )
            .property(
                "isRevision",
                JsonSchema::boolean()
                    .default_value(Value::Bool(false))
                    .description("Whether this revises a previous thought"),
            )
            .property(
                "revisesThought",
                JsonSchema::integer()
                    .minimum(1)
                    .description("Which thought number is being revised"),
            )
            .property(
                "branchFromThought",
                JsonSchema::integer()
                    .minimum(1)
                    .description("Thought number to branch from"),
            )
            .property(
                "branchId",
                JsonSchema::string().description("Identifier for the branch"),
            )
            .property(
                "needsMoreThoughts",
                JsonSchema::boolean()
                    .default_value(Value::Bool(false))
                    .description("If more thoughts are needed beyond totalThoughts"),
            )
            .property(
                "reflectionNeeded",
                JsonSchema::boolean()
                    .default_value(Value::Bool(false))
                    .description("Whether to perform self-reflection on the thought"),
            )
            .property(
                "reflectionStrategy",
                JsonSchema::string()
                    .enum_values(&ReflectionStrategy::ALL.map(ReflectionStrategy::as_str))
                    .description("Type of reflection; required when reflectionNeeded is true"),
            )
            .property(
                "performanceFeedback",
                JsonSchema::string().description(
                    "Feedback on thought effectiveness, e.g. correct or incorrect; \
                     required when reflectionNeeded is true",
                ),
            )
            .required(&[
                "thought",
                "nextThoughtNeeded",
                "thoughtNumber",
                "totalThoughts",
            ])
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let request: ThoughtRequest = serde_json::from_value(input)
            .map_err(|e| ToolError::invalid_input(e.to_string()))?;

        tracing::debug!(
            request_id = ctx.request_id.as_deref().unwrap_or("-"),
            thought_number = request.thought_number,
            "sequential_thinking call"
        );

        self.tracker
            .submit(request)
            .await
            .map(|receipt| ToolOutput::text(receipt.message))
            .map_err(|e| ToolError::execution_failed(e.to_string()))
    }
}
