use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

/// Knobs for one generation call. `model: None` selects the provider's
/// default text or vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub model: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub json_mode: bool,
}

pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_TEXT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_VISION_MAX_TOKENS: u32 = 1500;

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::text()
    }
}

impl GenerateOptions {
    pub fn text() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_TEXT_MAX_TOKENS,
            json_mode: false,
        }
    }

    pub fn vision() -> Self {
        Self {
            max_tokens: DEFAULT_VISION_MAX_TOKENS,
            ..Self::text()
        }
    }

    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Normalized result of any provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub provider: String,
    pub model: String,
}

impl ProviderResponse {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, text: String) -> Self {
        Self {
            text,
            usage: None,
            provider: provider.into(),
            model: model.into(),
        }
    }

    #[must_use]
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }
}

impl ProviderMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn user_with_image(text: impl Into<String>, source: ImageSource) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![
                ContentBlock::Text { text: text.into() },
                ContentBlock::Image { source },
            ],
        }
    }

    /// Concatenated text blocks, images skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::Image { .. }))
    }
}

impl ImageSource {
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Base64 {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// `data:<mime>;base64,<data>` form used by OpenAI image parts.
    pub fn data_url(&self) -> String {
        match self {
            Self::Base64 { media_type, data } => format!("data:{media_type};base64,{data}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_block_serde_shape() {
        let block = ContentBlock::Image {
            source: ImageSource::base64("image/png", "AAAA"),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "image",
                "source": {"type": "base64", "media_type": "image/png", "data": "AAAA"}
            })
        );
    }

    #[test]
    fn options_defaults() {
        let text = GenerateOptions::text();
        assert!((text.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(text.max_tokens, 1000);
        assert!(!text.json_mode);
        assert_eq!(GenerateOptions::vision().max_tokens, 1500);
        assert!(GenerateOptions::text().json().json_mode);
    }

    #[test]
    fn message_text_skips_images() {
        let msg = ProviderMessage::user_with_image("describe", ImageSource::base64("image/jpeg", "x"));
        assert_eq!(msg.text(), "describe");
        assert!(msg.has_image());
        assert!(!ProviderMessage::user("hi").has_image());
    }

    #[test]
    fn data_url_format() {
        let src = ImageSource::base64("image/webp", "Zm9v");
        assert_eq!(src.data_url(), "data:image/webp;base64,Zm9v");
    }

    #[test]
    fn usage_total_is_sum() {
        let usage = TokenUsage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }
}
