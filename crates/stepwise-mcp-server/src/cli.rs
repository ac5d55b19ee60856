use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "stepwise-mcp")]
#[command(author, version, about = "MCP server for sequential thinking sessions", long_about = None)]
pub struct Cli {
    /// Config file (jsonc, json, yml, yaml); discovered automatically when omitted
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `stepwise_thinking=trace` (RUST_LOG wins)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "stepwise-mcp",
            "--config",
            "stepwise.yml",
            "--log-level",
            "debug",
            "--json-logs",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("stepwise.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.json_logs);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["stepwise-mcp"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(!cli.json_logs);
    }
}
