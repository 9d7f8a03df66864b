use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;
use super::scrub::sanitize_api_error;
use super::traits::Provider;
use super::types::{GenerateOptions, ProviderMessage, ProviderResponse};
use crate::config::LlmConfig;
use crate::error::LlmError;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One entry in the fallback order. `provider` is `None` when the name is
/// unknown or has no credentials; it is still reported when reached.
struct ProviderSlot {
    name: String,
    provider: Option<Arc<dyn Provider>>,
}

/// Ordered multi-provider gateway. Built once from config and shared by `Arc`.
pub struct LlmGateway {
    slots: Vec<ProviderSlot>,
}

impl LlmGateway {
    /// Build from a pre-constructed provider list (name, provider) in fallback order.
    pub fn new(providers: Vec<(String, Option<Arc<dyn Provider>>)>) -> Self {
        Self {
            slots: providers
                .into_iter()
                .map(|(name, provider)| ProviderSlot { name, provider })
                .collect(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let timeout = config.request_timeout_secs;
        let providers = config
            .providers
            .iter()
            .map(|name| {
                let built: anyhow::Result<Arc<dyn Provider>> = match name.as_str() {
                    "openai" => OpenAiProvider::new(&config.openai, timeout)
                        .map(|p| Arc::new(p) as Arc<dyn Provider>),
                    "gemini" => GeminiProvider::new(&config.gemini, timeout)
                        .map(|p| Arc::new(p) as Arc<dyn Provider>),
                    other => Err(anyhow::anyhow!("unknown provider `{other}`")),
                };
                match built {
                    Ok(provider) => {
                        tracing::info!(provider = name.as_str(), "LLM provider initialized");
                        (name.clone(), Some(provider))
                    }
                    Err(e) => {
                        tracing::warn!(provider = name.as_str(), "LLM provider unavailable: {e}");
                        (name.clone(), None)
                    }
                }
            })
            .collect();
        Self::new(providers)
    }

    /// Provider names in fallback order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn configured_count(&self) -> usize {
        self.slots.iter().filter(|s| s.provider.is_some()).count()
    }

    pub async fn generate_text(
        &self,
        messages: &[ProviderMessage],
        options: &GenerateOptions,
    ) -> Result<ProviderResponse, LlmError> {
        self.generate_in_order(messages, options, false).await
    }

    pub async fn generate_with_vision(
        &self,
        messages: &[ProviderMessage],
        options: &GenerateOptions,
    ) -> Result<ProviderResponse, LlmError> {
        self.generate_in_order(messages, options, true).await
    }

    async fn generate_in_order(
        &self,
        messages: &[ProviderMessage],
        options: &GenerateOptions,
        vision: bool,
    ) -> Result<ProviderResponse, LlmError> {
        if self.slots.is_empty() {
            return Err(LlmError::NoProviders);
        }

        let mut failures = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let name = slot.name.as_str();
            let Some(provider) = slot.provider.as_ref() else {
                let err = LlmError::NotConfigured {
                    provider: name.to_string(),
                };
                tracing::warn!(provider = name, "Skipping provider: {err}");
                failures.push(format!("{name}: {err}"));
                continue;
            };

            if vision && !provider.supports_vision() {
                let err = LlmError::VisionUnsupported {
                    provider: name.to_string(),
                };
                tracing::warn!(provider = name, "Skipping provider: {err}");
                failures.push(format!("{name}: {err}"));
                continue;
            }

            match provider.generate(messages, options).await {
                Ok(response) if !response.text.trim().is_empty() => {
                    tracing::debug!(
                        provider = name,
                        model = response.model.as_str(),
                        total_tokens = response.usage.map(|u| u.total_tokens),
                        "LLM call succeeded"
                    );
                    return Ok(response);
                }
                Ok(_) => {
                    tracing::warn!(provider = name, "Provider returned empty content");
                    failures.push(format!("{name}: empty response content"));
                }
                Err(e) => {
                    let msg = sanitize_api_error(&format!("{e:#}"));
                    tracing::warn!(provider = name, "Provider call failed, trying next: {msg}");
                    failures.push(format!("{name}: {msg}"));
                }
            }
        }

        Err(LlmError::AllProvidersFailed {
            kind: if vision {
                "All vision-capable LLM"
            } else {
                "All LLM"
            },
            failures,
        })
    }

    /// Probe every provider concurrently. Never fails; unconfigured providers report `false`.
    pub async fn health_check(&self) -> BTreeMap<String, bool> {
        let probes = self.slots.iter().map(|slot| async move {
            let healthy = match slot.provider.as_ref() {
                Some(provider) => match provider.health_check().await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            provider = slot.name.as_str(),
                            "Health check failed: {}",
                            sanitize_api_error(&e.to_string())
                        );
                        false
                    }
                },
                None => false,
            };
            (slot.name.clone(), healthy)
        });
        join_all(probes).await.into_iter().collect()
    }
}
