//! Tool-related types for the protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON Schema for a tool's input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "additionalProperties"
    )]
    pub additional_properties: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl JsonSchema {
    fn scalar(schema_type: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            description: None,
            properties: None,
            required: None,
            additional_properties: None,
            extra: HashMap::new(),
        }
    }

    pub fn object() -> Self {
        Self {
            properties: Some(serde_json::json!({})),
            additional_properties: Some(false),
            ..Self::scalar("object")
        }
    }

    pub fn string() -> Self {
        Self::scalar("string")
    }

    pub fn integer() -> Self {
        Self::scalar("integer")
    }

    pub fn boolean() -> Self {
        Self::scalar("boolean")
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Lower bound for `integer` schemas
    pub fn minimum(mut self, minimum: i64) -> Self {
        self.extra.insert("minimum".to_string(), Value::from(minimum));
        self
    }

    /// Allowed values for `string` schemas
    pub fn enum_values(mut self, values: &[&str]) -> Self {
        self.extra.insert("enum".to_string(), Value::from(values.to_vec()));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.extra.insert("default".to_string(), value);
        self
    }

    pub fn property(mut self, name: &str, schema: JsonSchema) -> Self {
        let props = self.properties.get_or_insert(serde_json::json!({}));
        if let Some(obj) = props.as_object_mut() {
            obj.insert(
                name.to_string(),
                serde_json::to_value(schema).unwrap_or(Value::Null),
            );
        }
        self
    }

    pub fn required(mut self, fields: &[&str]) -> Self {
        self.required = Some(fields.iter().map(|s| s.to_string()).collect());
        self
    }
}

/// Tool specification as advertised by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: JsonSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: schema,
        }
    }
}

/// Output from a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ToolOutputContent>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolOutputContent::Text { text: text.into() }],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolOutputContent::Text { text } => text.as_str(),
        })
    }
}

/// Content type for tool output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolOutputContent {
    Text { text: String },
}
