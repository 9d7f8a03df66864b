use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Aggregation policy used for a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    FixedWeight,
    BrandFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_agent_timeout_ms")]
    pub agent_timeout_ms: u64,
    #[serde(default = "default_coordination_timeout_ms")]
    pub coordination_timeout_ms: u64,
    #[serde(default)]
    pub weights: AgentWeights,
    #[serde(default)]
    pub fallback_weights: FallbackWeights,
}

/// Weights of the fixed-weight policy. Renormalised over successful agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentWeights {
    pub size: f64,
    pub subject: f64,
    pub creativity: f64,
    pub mood: f64,
}

/// Weights of the brand-first degrade path. Applied to raw scores, failed agents count as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackWeights {
    pub size: f64,
    pub content: f64,
    pub creativity: f64,
    pub mood: f64,
}

fn default_agent_timeout_ms() -> u64 {
    30_000
}

fn default_coordination_timeout_ms() -> u64 {
    45_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            agent_timeout_ms: default_agent_timeout_ms(),
            coordination_timeout_ms: default_coordination_timeout_ms(),
            weights: AgentWeights::default(),
            fallback_weights: FallbackWeights::default(),
        }
    }
}

impl Default for AgentWeights {
    fn default() -> Self {
        Self {
            size: 0.20,
            subject: 0.35,
            creativity: 0.25,
            mood: 0.20,
        }
    }
}

impl Default for FallbackWeights {
    fn default() -> Self {
        Self {
            size: 0.25,
            content: 0.40,
            creativity: 0.20,
            mood: 0.15,
        }
    }
}

impl AgentWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [self.size, self.subject, self.creativity, self.mood]
    }

    pub fn formula(&self) -> String {
        format!(
            "{:.2}*size + {:.2}*subject + {:.2}*creativity + {:.2}*mood",
            self.size, self.subject, self.creativity, self.mood
        )
    }
}

impl FallbackWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [self.size, self.content, self.creativity, self.mood]
    }

    pub fn formula(&self) -> String {
        format!(
            "{:.2}*size + {:.2}*content + {:.2}*creativity + {:.2}*mood",
            self.size, self.content, self.creativity, self.mood
        )
    }
}
