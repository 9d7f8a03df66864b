use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle of a single evaluation run.
///
/// `Pending -> RunningBrandContext (brand-first only) -> RunningCoreAgents
/// -> Aggregating -> Completed | Failed`. A brand-first run that degrades
/// goes back to `RunningCoreAgents` from `Aggregating` once for the fallback
/// batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunPhase {
    Pending,
    RunningBrandContext,
    RunningCoreAgents,
    Aggregating,
    Completed,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use RunPhase::{
            Aggregating, Completed, Failed, Pending, RunningBrandContext, RunningCoreAgents,
        };
        matches!(
            (self, next),
            (Pending, RunningBrandContext | RunningCoreAgents)
                | (RunningBrandContext, RunningCoreAgents)
                | (RunningCoreAgents, Aggregating)
                | (Aggregating, RunningCoreAgents | Completed | Failed)
        )
    }
}

/// Tracks and logs phase changes for one run. Illegal transitions are
/// refused and logged; the phase is left unchanged.
#[derive(Debug)]
pub struct PhaseTracker {
    run_id: String,
    phase: RunPhase,
}

impl PhaseTracker {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            phase: RunPhase::Pending,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn advance(&mut self, next: RunPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::error!(
                run_id = self.run_id.as_str(),
                from = %self.phase,
                to = %next,
                "Illegal run phase transition"
            );
            return false;
        }
        tracing::info!(
            run_id = self.run_id.as_str(),
            from = %self.phase,
            to = %next,
            "Run phase changed"
        );
        self.phase = next;
        true
    }
}
