use crate::schema::StepwiseConfig;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Jsonc,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;

        match ext {
            "jsonc" => Some(Self::Jsonc),
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: StepwiseConfig,
    /// `None` when no file was found and defaults are in use
    pub path: Option<PathBuf>,
}

/// Load configuration, falling back to defaults when no file is discovered.
/// An explicit path that cannot be read or parsed is an error.
pub fn load_config(config_path: Option<&Path>) -> Result<StepwiseConfig> {
    resolve_config(config_path).map(|r| r.config)
}

pub fn resolve_config(config_path: Option<&Path>) -> Result<ResolvedConfig> {
    if let Some(path) = config_path {
        return load_config_from_file(path);
    }

    match find_config_file() {
        Some(path) => load_config_from_file(&path),
        None => Ok(ResolvedConfig {
            config: StepwiseConfig::default(),
            path: None,
        }),
    }
}

pub fn load_config_from_file(path: &Path) -> Result<ResolvedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| anyhow!("Unknown config format for: {}", path.display()))?;

    let config = parse_config_content(&content, format)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(ResolvedConfig {
        config: expand_env_vars(config),
        path: Some(path.to_path_buf()),
    })
}

fn parse_config_content(content: &str, format: ConfigFormat) -> Result<StepwiseConfig> {
    match format {
        ConfigFormat::Jsonc => json5::from_str(content).context("Failed to parse JSONC"),
        ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content).context("Failed to parse YAML"),
    }
}

const CONFIG_CANDIDATES: &[&str] = &[
    "stepwise.jsonc",
    "stepwise.json",
    "stepwise.yml",
    "stepwise.yaml",
    ".stepwise.jsonc",
    ".stepwise.json",
    ".stepwise.yml",
    ".stepwise.yaml",
];

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_CANDIDATES.iter().map(PathBuf::from);
    let global = dirs::home_dir().into_iter().flat_map(|home| {
        CONFIG_CANDIDATES
            .iter()
            .map(move |candidate| home.join(".config").join("stepwise").join(candidate))
    });

    local.chain(global).find(|path| path.exists())
}

fn expand_env_vars(mut config: StepwiseConfig) -> StepwiseConfig {
    config.server.name = expand_env_string(&config.server.name);
    config.telemetry.level = expand_env_string(&config.telemetry.level);
    config
}

fn expand_env_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        if chars.peek() == Some(&'{') {
            // ${VAR}
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            match env::var(&var_name) {
                Ok(value) if closed => result.push_str(&value),
                _ => {
                    result.push_str("${");
                    result.push_str(&var_name);
                    if closed {
                        result.push('}');
                    }
                }
            }
        } else {
            // $VAR, peek so the delimiter is kept
            let mut var_name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    var_name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            result.push_str(&match env::var(&var_name) {
                Ok(value) if !var_name.is_empty() => value,
                _ => format!("${var_name}"),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BranchNumbering, RevisionFallback};
    use tempfile::TempDir;

    #[test]
    fn test_expand_env_string_with_braces() {
        env::set_var("STEPWISE_TEST_VAR", "test_value");
        let result = expand_env_string("prefix_${STEPWISE_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");
    }

    #[test]
    fn test_expand_env_string_without_braces() {
        env::set_var("STEPWISE_TEST_VAR2", "value");
        let result = expand_env_string("hello $STEPWISE_TEST_VAR2 world");
        assert_eq!(result, "hello value world");
    }

    #[test]
    fn test_expand_env_string_missing_var() {
        let result = expand_env_string("prefix_${STEPWISE_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix_${STEPWISE_NONEXISTENT_VAR}_suffix");
        assert_eq!(expand_env_string("cost: $"), "cost: $");
    }

    #[test]
    fn test_expand_env_string_unterminated_braces_kept_verbatim() {
        assert_eq!(
            expand_env_string("name-${STEPWISE_UNSET_UNTERMINATED"),
            "name-${STEPWISE_UNSET_UNTERMINATED"
        );

        env::set_var("STEPWISE_TEST_VAR3", "value");
        assert_eq!(
            expand_env_string("${STEPWISE_TEST_VAR3"),
            "${STEPWISE_TEST_VAR3"
        );
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("stepwise.jsonc")),
            Some(ConfigFormat::Jsonc)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("stepwise.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("stepwise.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("stepwise.txt")), None);
    }

    #[test]
    fn test_config_priority_order_documented() {
        assert_eq!(CONFIG_CANDIDATES[0], "stepwise.jsonc");
        assert_eq!(CONFIG_CANDIDATES[1], "stepwise.json");
        assert_eq!(CONFIG_CANDIDATES[2], "stepwise.yml");
        assert_eq!(CONFIG_CANDIDATES[4], ".stepwise.jsonc");
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepwise.jsonc");
        let content = r#"{
  // unmatched revisions become appends
  "thinking": {
    "revision_fallback": "append" /* block comment */
  }
}"#;
        fs::write(&path, content).unwrap();

        let resolved = load_config_from_file(&path).unwrap();
        assert_eq!(resolved.path.as_deref(), Some(path.as_path()));
        assert_eq!(
            resolved.config.thinking.revision_fallback,
            RevisionFallback::Append
        );
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepwise.yml");
        let content = r#"
server:
  name: thinker
thinking:
  branch_numbering: sequential
telemetry:
  level: debug
  json_output: true
"#;
        fs::write(&path, content).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.name, "thinker");
        assert_eq!(config.thinking.branch_numbering, BranchNumbering::Sequential);
        assert_eq!(config.telemetry.level, "debug");
        assert!(config.telemetry.json_output);
    }

    #[test]
    fn test_env_vars_expanded_after_load() {
        env::set_var("STEPWISE_TEST_SERVER", "from-env");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepwise.json");
        fs::write(&path, r#"{"server": {"name": "${STEPWISE_TEST_SERVER}"}}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.name, "from-env");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_unknown_extension_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepwise.toml");
        fs::write(&path, "").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unknown config format"));
    }

    #[test]
    fn test_invalid_content_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stepwise.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
