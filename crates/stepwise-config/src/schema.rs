use serde::{Deserialize, Serialize};

/// Main Stepwise configuration
///
/// Configuration is loaded from (in priority order):
/// 1. `stepwise.jsonc` - JSON with comments
/// 2. `stepwise.json` - Standard JSON
/// 3. `stepwise.yml` / `stepwise.yaml` - YAML format
///
/// Also checks hidden variants (`.stepwise.*`) and `~/.config/stepwise/` for global config.
/// Every section is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepwiseConfig {
    /// MCP server identity
    #[serde(default)]
    pub server: ServerSettings,

    /// Sequential thinking tracker policy
    #[serde(default)]
    pub thinking: ThinkingSettings,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

// ============================================================================
// Server Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Name reported in `serverInfo` (default: stepwise-mcp)
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "stepwise-mcp".to_string()
}

// ============================================================================
// Thinking Configuration
// ============================================================================

/// Policy knobs for the sequential thinking tracker
///
/// # Example
///
/// ```yaml
/// thinking:
///   revision_fallback: reject
///   branch_numbering: free
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingSettings {
    #[serde(default)]
    pub revision_fallback: RevisionFallback,

    #[serde(default)]
    pub branch_numbering: BranchNumbering,
}

/// What happens when a revision names a thought number that is in range
/// but has no record on the requested branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionFallback {
    /// Report the missing target as an error
    #[default]
    Reject,
    /// Treat the request as a regular append using its `thoughtNumber`
    Append,
}

/// Numbering rule for thoughts added to a branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchNumbering {
    /// Any positive number is accepted, duplicates included
    #[default]
    Free,
    /// Branch thoughts follow the global strict-append sequence
    Sequential,
}

// ============================================================================
// Telemetry Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Default filter directive when `RUST_LOG` is unset (default: warn)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON log records
    #[serde(default)]
    pub json_output: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_output: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StepwiseConfig::default();
        assert_eq!(config.server.name, "stepwise-mcp");
        assert_eq!(config.thinking.revision_fallback, RevisionFallback::Reject);
        assert_eq!(config.thinking.branch_numbering, BranchNumbering::Free);
        assert_eq!(config.telemetry.level, "warn");
        assert!(!config.telemetry.json_output);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: StepwiseConfig =
            serde_json::from_str(r#"{"thinking": {"branch_numbering": "sequential"}}"#).unwrap();
        assert_eq!(config.thinking.branch_numbering, BranchNumbering::Sequential);
        assert_eq!(config.thinking.revision_fallback, RevisionFallback::Reject);
        assert_eq!(config.server, ServerSettings::default());
    }

    #[test]
    fn test_unknown_policy_value_is_rejected() {
        let result: Result<StepwiseConfig, _> =
            serde_json::from_str(r#"{"thinking": {"revision_fallback": "ignore"}}"#);
        assert!(result.is_err());
    }
}
