use super::{Orchestrator, new_run_id, run_core_batch, run_vision};
use crate::agents::scoring::weighted_score;
use crate::agents::{Agent, EvaluationContext};
use crate::config::{AgentWeights, OrchestratorConfig, StrategyKind};
use crate::evaluation::{
    AgentSlots, EvaluationRecord, EvaluationRequest, PhaseTracker, RunPhase, RunStatus,
    clamp_score, types::millis,
};
use crate::llm::LlmGateway;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Four heuristic agents in parallel, combined by a fixed weight table.
/// Failed agents drop out and the remaining weights are renormalised.
pub struct FixedWeightOrchestrator {
    gateway: Arc<LlmGateway>,
    weights: AgentWeights,
    agent_timeout: Duration,
}

impl FixedWeightOrchestrator {
    pub fn new(config: &OrchestratorConfig, gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            weights: config.weights,
            agent_timeout: Duration::from_millis(config.agent_timeout_ms),
        }
    }

    fn agents() -> [Agent; 4] {
        [
            Agent::SizeCompliance,
            Agent::SubjectAdherence,
            Agent::Creativity,
            Agent::MoodConsistency,
        ]
    }

    pub async fn run(&self, request: EvaluationRequest) -> EvaluationRecord {
        let started = Instant::now();
        let mut tracker = PhaseTracker::new(new_run_id());
        tracing::info!(
            run_id = tracker.run_id(),
            strategy = "fixed_weight",
            channel = %request.channel,
            brand = request.brand.name.as_str(),
            "Starting evaluation"
        );

        tracker.advance(RunPhase::RunningCoreAgents);
        let ctx = Arc::new(EvaluationContext::new(Arc::new(request)));
        let (agents, vision) = tokio::join!(
            run_core_batch(Self::agents(), Arc::clone(&ctx), self.agent_timeout),
            run_vision(&self.gateway, &ctx, self.agent_timeout),
        );

        tracker.advance(RunPhase::Aggregating);
        let (final_score, status, error) = match renormalized_score(&agents, &self.weights) {
            Some(score) => (score, RunStatus::Completed, None),
            None => (0, RunStatus::Failed, Some("All agents failed".to_string())),
        };
        tracker.advance(match status {
            RunStatus::Completed => RunPhase::Completed,
            RunStatus::Failed => RunPhase::Failed,
        });
        debug_assert!(tracker.phase().is_terminal());

        let total = millis(started.elapsed());
        tracing::info!(
            run_id = tracker.run_id(),
            final_score,
            total_ms = total,
            status = ?status,
            "Evaluation finished"
        );

        EvaluationRecord {
            run_id: tracker.run_id().to_string(),
            agents,
            brand_alignment: None,
            vision,
            coordination: None,
            final_score,
            aggregation_formula: self.weights.formula(),
            total_execution_time_ms: total,
            status,
            error,
        }
    }
}

impl Orchestrator for FixedWeightOrchestrator {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::FixedWeight
    }

    fn evaluate<'a>(
        &'a self,
        request: EvaluationRequest,
    ) -> Pin<Box<dyn Future<Output = EvaluationRecord> + Send + 'a>> {
        Box::pin(self.run(request))
    }
}

/// Weighted average over successful agents only. `None` when every agent failed.
pub fn renormalized_score(agents: &AgentSlots, weights: &AgentWeights) -> Option<u8> {
    let pairs: Vec<(f64, f64)> = agents
        .as_array()
        .into_iter()
        .zip(weights.as_array())
        .filter(|(result, _)| result.is_success())
        .map(|(result, weight)| (weight, f64::from(result.score)))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    Some(clamp_score(weighted_score(&pairs)))
}
