pub mod gateway;
pub mod gemini;
pub mod http_client;
pub mod openai;
pub mod scrub;
pub mod traits;
pub mod types;

pub use gateway::LlmGateway;
pub use http_client::build_provider_client_with_timeout;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::{Provider, ProviderCapabilities};
pub use types::{
    ContentBlock, GenerateOptions, ImageSource, MessageRole, ProviderMessage, ProviderResponse,
    TokenUsage,
};
