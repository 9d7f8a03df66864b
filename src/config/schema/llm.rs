use serde::{Deserialize, Serialize};

/// Provider fallback order and per-provider credentials/models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Providers tried in this order until one succeeds.
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "ProviderConfig::openai")]
    pub openai: ProviderConfig,
    #[serde(default = "ProviderConfig::gemini")]
    pub gemini: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
}

impl ProviderConfig {
    pub fn openai() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            text_model: "gpt-4o-mini".into(),
            vision_model: "gpt-4o".into(),
        }
    }

    pub fn gemini() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            text_model: "gemini-1.5-flash".into(),
            vision_model: "gemini-1.5-pro".into(),
        }
    }
}

fn default_providers() -> Vec<String> {
    vec!["openai".into(), "gemini".into()]
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            request_timeout_secs: default_request_timeout_secs(),
            openai: ProviderConfig::openai(),
            gemini: ProviderConfig::gemini(),
        }
    }
}

impl LlmConfig {
    /// Parse a comma-separated provider list such as `"openai, gemini"`.
    pub fn parse_provider_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|p| p.trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_openai_then_gemini() {
        let cfg = LlmConfig::default();
        assert_eq!(cfg.providers, vec!["openai", "gemini"]);
        assert_eq!(cfg.openai.text_model, "gpt-4o-mini");
        assert_eq!(cfg.gemini.vision_model, "gemini-1.5-pro");
    }

    #[test]
    fn provider_list_parsing_trims_and_skips_blanks() {
        assert_eq!(
            LlmConfig::parse_provider_list(" Gemini , ,openai "),
            vec!["gemini", "openai"]
        );
        assert!(LlmConfig::parse_provider_list("").is_empty());
    }

    #[test]
    fn partial_toml_fills_provider_defaults() {
        let cfg: LlmConfig = toml::from_str("providers = [\"gemini\"]").expect("parse");
        assert_eq!(cfg.providers, vec!["gemini"]);
        assert_eq!(cfg.request_timeout_secs, 60);
        assert_eq!(cfg.openai.base_url, "https://api.openai.com/v1");
    }
}
