use super::super::{LlmConfig, LoggingConfig, OrchestratorConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path the config was loaded from - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.providers.is_empty() {
            return Err(ConfigError::Validation(
                "llm.providers must list at least one provider".into(),
            ));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "llm.request_timeout_secs must be positive".into(),
            ));
        }
        if self.orchestrator.agent_timeout_ms == 0 || self.orchestrator.coordination_timeout_ms == 0
        {
            return Err(ConfigError::Validation(
                "orchestrator timeouts must be positive".into(),
            ));
        }
        validate_weights("orchestrator.weights", &self.orchestrator.weights.as_array())?;
        validate_weights(
            "orchestrator.fallback_weights",
            &self.orchestrator.fallback_weights.as_array(),
        )?;
        if self.logging.max_level().is_none() {
            return Err(ConfigError::Validation(format!(
                "logging.level `{}` is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn validate_weights(table: &str, weights: &[f64]) -> Result<(), ConfigError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ConfigError::Validation(format!(
            "{table} must contain finite, non-negative weights"
        )));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{table} must have a positive sum"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentWeights, StrategyKind};

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().expect("defaults validate");
    }

    #[test]
    fn empty_provider_list_is_rejected() {
        let mut cfg = Config::default();
        cfg.llm.providers.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at least one provider"));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut cfg = Config::default();
        cfg.orchestrator.weights = AgentWeights {
            size: -0.1,
            ..AgentWeights::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let mut cfg = Config::default();
        cfg.orchestrator.weights = AgentWeights {
            size: 0.0,
            subject: 0.0,
            creativity: 0.0,
            mood: 0.0,
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("positive sum"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = Config::default();
        cfg.orchestrator.agent_timeout_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_toml_uses_every_default() {
        let cfg: Config = toml::from_str("").expect("parse empty");
        assert_eq!(cfg.orchestrator.strategy, StrategyKind::FixedWeight);
        assert_eq!(cfg.llm.providers.len(), 2);
        assert_eq!(cfg.logging.level, "info");
    }
}
