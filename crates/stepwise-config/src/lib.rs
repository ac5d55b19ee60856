pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_file, resolve_config, ConfigFormat, ResolvedConfig};
pub use schema::{
    BranchNumbering, RevisionFallback, ServerSettings, StepwiseConfig, TelemetrySettings,
    ThinkingSettings,
};
