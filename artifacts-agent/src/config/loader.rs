//! Configuration loading from files and environment variables.

use config::{Config, Environment, File};

use super::AgentConfig;
use crate::error::{AgentError, AgentResult};

/// Load configuration from `config.toml` (optional) and `ARTIFACTS__*` env vars
pub fn load_config() -> AgentResult<AgentConfig> {
    let config: AgentConfig = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("ARTIFACTS")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| AgentError::Config {
            message: format!("Failed to build config: {}", e),
        })?
        .try_deserialize()
        .map_err(|e| AgentError::Config {
            message: format!("Failed to deserialize config: {}", e),
        })?;

    config.validate()?;
    Ok(config)
}
