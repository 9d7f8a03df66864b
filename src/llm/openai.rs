use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, scrub_secret_patterns};
use super::traits::{Provider, ProviderCapabilities, resolve_model};
use super::types::{
    ContentBlock, GenerateOptions, MessageRole, ProviderMessage, ProviderResponse, TokenUsage,
};
use crate::config::ProviderConfig;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value.
    auth_header: String,
    base_url: String,
    text_model: String,
    vision_model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

/// Plain string for text-only turns, part array once an image is attached.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .context("OpenAI API key not set. Set OPENAI_API_KEY or edit config.toml.")?;

        Ok(Self {
            auth_header: format!("Bearer {key}"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
            client: build_provider_client_with_timeout(timeout_secs),
        })
    }

    fn role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    fn map_message(message: &ProviderMessage) -> Message {
        let role = Self::role(message.role);
        if !message.has_image() {
            return Message {
                role,
                content: MessageContent::Text(scrub_secret_patterns(&message.text()).into_owned()),
            };
        }

        let parts = message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => ContentPart::Text {
                    text: scrub_secret_patterns(text).into_owned(),
                },
                ContentBlock::Image { source } => ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: source.data_url(),
                    },
                },
            })
            .collect();

        Message {
            role,
            content: MessageContent::Parts(parts),
        }
    }

    fn build_request(
        messages: &[ProviderMessage],
        model: &str,
        options: &GenerateOptions,
    ) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: messages.iter().map(Self::map_message).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_mode.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        }
    }

    fn extract_text(chat_response: &ChatResponse) -> anyhow::Result<String> {
        chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No content returned from OpenAI"))
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", &self.auth_header)
            .json(request)
            .send()
            .await
            .context("OpenAI request failed")?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }

        response
            .json()
            .await
            .context("OpenAI response JSON decode failed")
    }
}

impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
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
            let request = Self::build_request(messages, model, options);
            let chat_response = self.call_api(&request).await?;
            let text = Self::extract_text(&chat_response)?;
            let usage = chat_response
                .usage
                .as_ref()
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));
            let api_model = chat_response.model.as_deref().unwrap_or(model);
            Ok(ProviderResponse::new("openai", api_model, text).with_usage(usage))
        })
    }

    fn health_check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/models", self.base_url))
                .header("Authorization", &self.auth_header)
                .send()
                .await
                .context("OpenAI health probe failed")?;
            if !response.status().is_success() {
                return Err(api_error("OpenAI", response).await);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ImageSource;

    fn config() -> ProviderConfig {
        ProviderConfig {
            api_key: Some("sk-test".into()),
            ..ProviderConfig::openai()
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = OpenAiProvider::new(&ProviderConfig::openai(), 5)
            .err()
            .expect("must fail without key");
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let blank = ProviderConfig {
            api_key: Some("   ".into()),
            ..ProviderConfig::openai()
        };
        assert!(OpenAiProvider::new(&blank, 5).is_err());
        assert!(OpenAiProvider::new(&config(), 5).is_ok());
    }

    #[test]
    fn json_mode_sets_response_format() {
        let messages = [ProviderMessage::system("be terse"), ProviderMessage::user("hi")];
        let request =
            OpenAiProvider::build_request(&messages, "gpt-4o-mini", &GenerateOptions::text().json());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 1000);
    }

    #[test]
    fn plain_mode_omits_response_format() {
        let messages = [ProviderMessage::user("hi")];
        let request = OpenAiProvider::build_request(&messages, "m", &GenerateOptions::text());
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn image_becomes_data_url_part() {
        let messages = [ProviderMessage::user_with_image(
            "rate this",
            ImageSource::base64("image/png", "QUJD"),
        )];
        let request = OpenAiProvider::build_request(&messages, "gpt-4o", &GenerateOptions::vision());
        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,QUJD");
    }

    #[test]
    fn empty_content_is_an_error() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": "  "}}]
        }))
        .unwrap();
        assert!(OpenAiProvider::extract_text(&response).is_err());
    }

    #[test]
    fn default_models_follow_config() {
        let provider = OpenAiProvider::new(&config(), 5).unwrap();
        assert_eq!(provider.default_model(false), "gpt-4o-mini");
        assert_eq!(provider.default_model(true), "gpt-4o");
        assert!(provider.supports_vision());
    }
}
