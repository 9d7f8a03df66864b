pub mod phase;
pub mod types;

pub use phase::{PhaseTracker, RunPhase};
pub use types::{
    AgentResult, AgentSlots, AgentStatus, BrandContext, BrandProfile, Channel,
    CoordinationSummary, EvaluationRecord, EvaluationRequest, ImagePayload, MediaMetadata,
    RunStatus, clamp_score,
};
