use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `brandlens`.
///
/// Agent and orchestrator boundaries never surface these to callers: agent
/// failures become `AgentResult`s with an error status. The hierarchy exists
/// for config loading, the gateway, and the internals of each scorer.
#[derive(Debug, Error)]
pub enum BrandlensError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("agent: {0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} is not configured")]
    NotConfigured { provider: String },

    #[error("provider {provider} does not support vision input")]
    VisionUnsupported { provider: String },

    #[error("no providers configured")]
    NoProviders,

    #[error("{kind} providers failed: {}", failures.join("; "))]
    AllProvidersFailed {
        kind: &'static str,
        failures: Vec<String>,
    },
}

// ─── Agent errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model response was not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("model response is missing required field `{0}`")]
    MissingField(String),

    #[error("no image payload supplied for vision evaluation")]
    MissingImage,

    #[error(transparent)]
    Gateway(#[from] LlmError),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BrandlensError>;
