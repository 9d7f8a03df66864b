//! Google Gemini provider over the `generateContent` REST endpoint.

use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
use super::traits::{Provider, ProviderCapabilities, resolve_model};
use super::types::{
    ContentBlock, GenerateOptions, ImageSource, MessageRole, ProviderMessage, ProviderResponse,
    TokenUsage,
};
use crate::config::ProviderConfig;
use anyhow::Context;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .context("Gemini API key not set. Set GEMINI_API_KEY or GOOGLE_API_KEY, or edit config.toml.")?;

        Ok(Self {
            api_key: key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
            client: build_provider_client_with_timeout(timeout_secs),
        })
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn map_parts(message: &ProviderMessage) -> Vec<Part> {
        message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Part::text(scrub_secret_patterns(text).into_owned()),
                ContentBlock::Image {
                    source: ImageSource::Base64 { media_type, data },
                } => Part::inline_data(media_type.clone(), data.clone()),
            })
            .collect()
    }

    /// System turns are folded into `systemInstruction`; assistant turns use
    /// Gemini's `model` role.
    fn build_request(
        messages: &[ProviderMessage],
        options: &GenerateOptions,
    ) -> GenerateContentRequest {
        let system_parts: Vec<Part> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .flat_map(Self::map_parts)
            .collect();

        let contents = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| Content {
                role: Some(
                    match m.role {
                        MessageRole::Assistant => "model",
                        MessageRole::User | MessageRole::System => "user",
                    }
                    .to_string(),
                ),
                parts: Self::map_parts(m),
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: (!system_parts.is_empty()).then_some(Content {
                role: None,
                parts: system_parts,
            }),
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                response_mime_type: options.json_mode.then_some("application/json"),
            },
        }
    }

    fn extract_text(result: &GenerateContentResponse) -> anyhow::Result<String> {
        let text = result
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("No content returned from Gemini");
        }
        Ok(text)
    }

    async fn call_api(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .context("Gemini request failed")?;

        if !response.status().is_success() {
            return Err(api_error("Gemini", response).await);
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .context("Gemini response JSON decode failed")?;
        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }
        Ok(result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities { vision: true }
    }

    fn default_model(&self, vision: bool) -> &str {
        if vision {
            &self.vision_model
        } else {
            &self.text_model
        }
    }

    fn generate<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let model = resolve_model(self, messages, options);
            let request = Self::build_request(messages, options);
            let result = self.call_api(model, &request).await?;
            let text = Self::extract_text(&result)?;
            let usage = result
                .usage_metadata
                .as_ref()
                .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count));
            let api_model = result.model_version.as_deref().unwrap_or(model);
            Ok(ProviderResponse::new("gemini", api_model, text).with_usage(usage))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected() {
        assert!(GeminiProvider::new(&ProviderConfig::gemini(), 5).is_err());
    }

    #[test]
    fn model_name_is_prefixed_once() {
        assert_eq!(GeminiProvider::model_name("gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(
            GeminiProvider::model_name("models/gemini-1.5-pro"),
            "models/gemini-1.5-pro"
        );
    }

    #[test]
    fn system_message_becomes_system_instruction() {
        let messages = [
            ProviderMessage::system("You are a brand critic."),
            ProviderMessage::user("Score this."),
        ];
        let request = GeminiProvider::build_request(&messages, &GenerateOptions::text().json());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "You are a brand critic."
        );
        assert_eq!(value["contents"].as_array().unwrap().len(), 1);
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn image_becomes_inline_data() {
        let messages = [ProviderMessage::user_with_image(
            "look",
            ImageSource::base64("image/jpeg", "/9j/"),
        )];
        let request = GeminiProvider::build_request(&messages, &GenerateOptions::vision());
        let value = serde_json::to_value(&request).unwrap();
        let part = &value["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(part["mimeType"], "image/jpeg");
        assert_eq!(part["data"], "/9j/");
        assert!(value.get("systemInstruction").is_none());
        assert!(value["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn empty_candidates_are_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(GeminiProvider::extract_text(&response).is_err());
    }

    #[test]
    fn text_parts_are_concatenated_verbatim() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "{\"reasoning\": \"bold and "},
                {"text": "bright\", \"finalScore\": 81}"}
            ]}}],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2}
        }))
        .unwrap();
        let text = GeminiProvider::extract_text(&response).unwrap();
        assert_eq!(text, "{\"reasoning\": \"bold and bright\", \"finalScore\": 81}");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["reasoning"], "bold and bright");
    }
}
