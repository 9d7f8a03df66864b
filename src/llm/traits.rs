use super::types::{GenerateOptions, ProviderMessage, ProviderResponse};
use std::future::Future;
use std::pin::Pin;

/// Provider capabilities reported at runtime.
#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    pub vision: bool,
}

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai", "gemini").
    fn name(&self) -> &str;

    /// Runtime capability flags.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    fn supports_vision(&self) -> bool {
        self.capabilities().vision
    }

    /// Model used when `options.model` is `None`.
    fn default_model(&self, vision: bool) -> &str;

    /// One completion over `messages`. Image blocks are only sent by
    /// providers that report vision support.
    fn generate<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>>;

    /// Cheap liveness probe. Default sends a one-token completion.
    fn health_check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async move {
            let messages = [ProviderMessage::user("ping")];
            let options = GenerateOptions::text().with_max_tokens(1);
            self.generate(&messages, &options).await.map(|_| ())
        })
    }
}

/// Resolve the model for a call: explicit override first, then the provider default.
pub fn resolve_model<'a>(
    provider: &'a dyn Provider,
    messages: &[ProviderMessage],
    options: &'a GenerateOptions,
) -> &'a str {
    match options.model.as_deref() {
        Some(model) if !model.trim().is_empty() => model,
        _ => provider.default_model(messages.iter().any(ProviderMessage::has_image)),
    }
}
