pub mod schema;

pub use schema::{
    AgentWeights, Config, FallbackWeights, LlmConfig, LoggingConfig, OrchestratorConfig,
    ProviderConfig, StrategyKind,
};
