mod defaults;
mod loader;
mod schemas;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use loader::load_config;
pub use schemas::{ApiConfig, CharacterConfig, EngineConfig, FarmOrder, MetricsConfig};

use crate::error::{AgentError, AgentResult};
use defaults::{default_api, default_engine};

/// Agent configuration
/// File values are overridden by `ARTIFACTS__<SECTION>__<KEY>` env vars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_api")]
    pub api: ApiConfig,

    #[serde(default = "default_engine")]
    pub engine: EngineConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub characters: Vec<CharacterConfig>,
}

impl AgentConfig {
    /// Reject configurations the agent cannot run with
    pub fn validate(&self) -> AgentResult<()> {
        if self.api.token.trim().is_empty() {
            return Err(AgentError::Config {
                message: "api.token is required".to_string(),
            });
        }
        if self.characters.is_empty() {
            return Err(AgentError::Config {
                message: "at least one [[characters]] entry is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for character in &self.characters {
            if !seen.insert(character.name.as_str()) {
                return Err(AgentError::Config {
                    message: format!("character {} is configured twice", character.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn parse(toml: &str) -> AgentConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(
            r#"
            [api]
            token = "secret"

            [[characters]]
            name = "hero"
            "#,
        );

        assert_eq!(config.api.host, "https://api.artifactsmmo.com");
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.engine.bank_every_ticks, 30);
        assert_eq!(config.engine.level_cap, 30);
        assert_eq!(config.engine.sweep_kills, 20);
        assert_eq!(config.engine.failure_pause().as_secs(), 60);
        assert!(config.metrics.listen.is_none());
        assert!(!config.characters[0].crafter);
        tokio_test::assert_ok!(config.validate());
    }

    #[test]
    fn test_characters_with_orders() {
        let config = parse(
            r#"
            [api]
            token = "secret"

            [engine]
            level_cap = 40

            [[characters]]
            name = "hero"

            [[characters]]
            name = "smith"
            crafter = true
            farm_orders = [{ code = "feather", quantity = 20 }]
            "#,
        );

        assert_eq!(config.engine.level_cap, 40);
        assert_eq!(config.engine.sweep_kills, 20);
        let smith = &config.characters[1];
        assert!(smith.crafter);
        assert_eq!(
            smith.farm_orders,
            vec![FarmOrder {
                code: "feather".to_string(),
                quantity: 20
            }]
        );
    }

    #[test]
    fn test_validate_rejects_missing_token_and_duplicates() {
        let config = parse(
            r#"
            [[characters]]
            name = "hero"
            "#,
        );
        assert!(matches!(config.validate(), Err(AgentError::Config { .. })));

        let config = parse(
            r#"
            [api]
            token = "secret"

            [[characters]]
            name = "hero"

            [[characters]]
            name = "hero"
            "#,
        );
        assert!(matches!(config.validate(), Err(AgentError::Config { .. })));
    }
}
