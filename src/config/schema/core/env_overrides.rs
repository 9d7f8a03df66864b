use super::super::{LlmConfig, StrategyKind};
use super::Config;
use std::str::FromStr;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty or unparsable
    /// values leave the file/default value in place.
    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(list) = non_empty("LLM_PROVIDERS") {
            let providers = LlmConfig::parse_provider_list(&list);
            if !providers.is_empty() {
                self.llm.providers = providers;
            }
        }

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.llm.openai.api_key = Some(key);
        }

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")) {
            self.llm.gemini.api_key = Some(key);
        }

        if let Some(raw) = non_empty("BRANDLENS_STRATEGY")
            && let Ok(strategy) = StrategyKind::from_str(raw.trim())
        {
            self.orchestrator.strategy = strategy;
        }

        if let Some(raw) = non_empty("BRANDLENS_AGENT_TIMEOUT_MS")
            && let Ok(ms) = raw.trim().parse::<u64>()
            && ms > 0
        {
            self.orchestrator.agent_timeout_ms = ms;
        }

        if let Some(level) = non_empty("BRANDLENS_LOG") {
            self.logging.level = level.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn apply(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut cfg = Config::default();
        cfg.apply_overrides_from(|name| map.get(name).cloned());
        cfg
    }

    #[test]
    fn provider_order_and_keys_are_overridden() {
        let cfg = apply(&[
            ("LLM_PROVIDERS", "gemini,openai"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("GOOGLE_API_KEY", "g-key"),
        ]);
        assert_eq!(cfg.llm.providers, vec!["gemini", "openai"]);
        assert_eq!(cfg.llm.openai.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(cfg.llm.gemini.api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let cfg = apply(&[("GEMINI_API_KEY", "primary"), ("GOOGLE_API_KEY", "secondary")]);
        assert_eq!(cfg.llm.gemini.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn strategy_and_timeout_overrides() {
        let cfg = apply(&[
            ("BRANDLENS_STRATEGY", "brand_first"),
            ("BRANDLENS_AGENT_TIMEOUT_MS", "2500"),
            ("BRANDLENS_LOG", "debug"),
        ]);
        assert_eq!(cfg.orchestrator.strategy, StrategyKind::BrandFirst);
        assert_eq!(cfg.orchestrator.agent_timeout_ms, 2500);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn invalid_values_are_ignored() {
        let cfg = apply(&[
            ("LLM_PROVIDERS", " , "),
            ("BRANDLENS_STRATEGY", "round_robin"),
            ("BRANDLENS_AGENT_TIMEOUT_MS", "0"),
            ("OPENAI_API_KEY", ""),
        ]);
        assert_eq!(cfg.llm.providers, vec!["openai", "gemini"]);
        assert_eq!(cfg.orchestrator.strategy, StrategyKind::FixedWeight);
        assert_eq!(cfg.orchestrator.agent_timeout_ms, 30_000);
        assert!(cfg.llm.openai.api_key.is_none());
    }
}
