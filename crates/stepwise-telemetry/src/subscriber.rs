use std::io;
use stepwise_config::TelemetrySettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging settings after CLI overrides are applied
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub level: String,
    pub json_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_output: false,
        }
    }
}

impl From<&TelemetrySettings> for TelemetryConfig {
    fn from(settings: &TelemetrySettings) -> Self {
        Self {
            level: settings.level.clone(),
            json_output: settings.json_output,
        }
    }
}

impl TelemetryConfig {
    pub fn with_level(mut self, level: Option<&str>) -> Self {
        if let Some(level) = level {
            self.level = level.to_string();
        }
        self
    }

    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output |= json_output;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(default_level()))
    }
}

fn default_level() -> String {
    "warn".to_string()
}

/// Install the global subscriber. Output goes to stderr since stdout carries
/// the JSON-RPC stream. Returns false if a subscriber was already installed.
pub fn init_subscriber(config: &TelemetryConfig) -> bool {
    let filter = config.filter();

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr))
            .try_init()
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.level, "warn");
        assert!(!config.json_output);
    }

    #[test]
    fn test_from_settings_and_overrides() {
        let settings = TelemetrySettings {
            level: "info".to_string(),
            json_output: false,
        };
        let config = TelemetryConfig::from(&settings)
            .with_level(Some("debug"))
            .with_json_output(true);
        assert_eq!(config.level, "debug");
        assert!(config.json_output);

        let untouched = TelemetryConfig::from(&settings).with_level(None);
        assert_eq!(untouched.level, "info");
    }

    #[test]
    fn test_second_init_reports_false() {
        let config = TelemetryConfig::default();
        init_subscriber(&config);
        assert!(!init_subscriber(&config));
    }
}
