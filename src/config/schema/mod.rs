mod core;
mod llm;
mod logging;
mod orchestrator;

pub use core::Config;
pub use llm::{LlmConfig, ProviderConfig};
pub use logging::LoggingConfig;
pub use orchestrator::{AgentWeights, FallbackWeights, OrchestratorConfig, StrategyKind};
