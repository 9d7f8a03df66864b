use super::{Orchestrator, new_run_id, run_core_batch, run_vision, run_with_deadline};
use crate::agents::brand_alignment::brand_context_from;
use crate::agents::llm_json::{optional_string, parse_json_object, required_score, string_list};
use crate::agents::{Agent, EvaluationContext};
use crate::config::{FallbackWeights, OrchestratorConfig, StrategyKind};
use crate::evaluation::{
    AgentResult, AgentSlots, CoordinationSummary, EvaluationRecord, EvaluationRequest,
    PhaseTracker, RunPhase, RunStatus, clamp_score, types::millis,
};
use crate::llm::{GenerateOptions, LlmGateway, ProviderMessage};
use anyhow::Context;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

const COORDINATOR_SYSTEM_PROMPT: &str = "You are an expert at coordinating multi-agent \
     evaluations for brand content. Always respond with valid JSON.";

/// Brand alignment first, then four core agents with the brand context,
/// then one LLM coordination pass for the final verdict. When coordination
/// fails the core agents are rerun without context and combined by the
/// fallback weight table.
pub struct BrandFirstOrchestrator {
    gateway: Arc<LlmGateway>,
    fallback_weights: FallbackWeights,
    agent_timeout: Duration,
    coordination_timeout: Duration,
}

impl BrandFirstOrchestrator {
    pub fn new(config: &OrchestratorConfig, gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            fallback_weights: config.fallback_weights,
            agent_timeout: Duration::from_millis(config.agent_timeout_ms),
            coordination_timeout: Duration::from_millis(config.coordination_timeout_ms),
        }
    }

    fn core_agents(&self) -> [Agent; 4] {
        [
            Agent::SizeCompliance,
            Agent::ContentQuality(Arc::clone(&self.gateway)),
            Agent::Creativity,
            Agent::MoodConsistency,
        ]
    }

    pub async fn run(&self, request: EvaluationRequest) -> EvaluationRecord {
        let started = Instant::now();
        let mut tracker = PhaseTracker::new(new_run_id());
        tracing::info!(
            run_id = tracker.run_id(),
            strategy = "brand_first",
            channel = %request.channel,
            brand = request.brand.name.as_str(),
            "Starting evaluation"
        );
        let request = Arc::new(request);

        tracker.advance(RunPhase::RunningBrandContext);
        let base = EvaluationContext::new(Arc::clone(&request));
        let brand = run_with_deadline(
            Agent::BrandAlignment(Arc::clone(&self.gateway)),
            Arc::new(base.clone()),
            self.agent_timeout,
        )
        .await;
        let brand_context = if brand.is_success() {
            Some(brand_context_from(
                brand.score,
                &brand.reasoning,
                brand.details.as_ref(),
            ))
        } else {
            tracing::warn!(
                run_id = tracker.run_id(),
                "Brand alignment failed; core agents run without brand context"
            );
            None
        };

        tracker.advance(RunPhase::RunningCoreAgents);
        let ctx = Arc::new(base.with_brand_context(brand_context));
        let (agents, vision) = tokio::join!(
            run_core_batch(self.core_agents(), Arc::clone(&ctx), self.agent_timeout),
            run_vision(&self.gateway, &ctx, self.agent_timeout),
        );

        tracker.advance(RunPhase::Aggregating);
        let coordinated = self.coordinate(&request, &brand, &agents).await;
        match coordinated {
            Ok((score, summary)) => {
                tracker.advance(RunPhase::Completed);
                debug_assert!(tracker.phase().is_terminal());
                let final_score = clamp_score(score);
                let total = millis(started.elapsed());
                tracing::info!(
                    run_id = tracker.run_id(),
                    final_score,
                    total_ms = total,
                    "Evaluation finished"
                );
                EvaluationRecord {
                    run_id: tracker.run_id().to_string(),
                    agents,
                    brand_alignment: Some(brand),
                    vision,
                    aggregation_formula: format!(
                        "Brand-first multi-agent evaluation with 4 core agents: {}",
                        summary.reasoning
                    ),
                    coordination: Some(summary),
                    final_score,
                    total_execution_time_ms: total,
                    status: RunStatus::Completed,
                    error: None,
                }
            }
            Err(e) => {
                let cause = format!("{e:#}");
                tracing::warn!(
                    run_id = tracker.run_id(),
                    error = cause.as_str(),
                    "Coordination failed; falling back to fixed formula"
                );
                let agents = self.rerun_without_context(&mut tracker, request).await;
                self.fallback_record(tracker, agents, brand, vision, cause, started)
            }
        }
    }

    async fn coordinate(
        &self,
        request: &EvaluationRequest,
        brand: &AgentResult,
        agents: &AgentSlots,
    ) -> anyhow::Result<(f64, CoordinationSummary)> {
        let messages = [
            ProviderMessage::system(COORDINATOR_SYSTEM_PROMPT),
            ProviderMessage::user(coordination_prompt(request, brand, agents)),
        ];
        let options = GenerateOptions::text().json();

        let response = tokio::time::timeout(
            self.coordination_timeout,
            self.gateway.generate_text(&messages, &options),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "coordination timeout after {}ms",
                millis(self.coordination_timeout)
            )
        })?
        .context("coordination call failed")?;

        let value = parse_json_object(&response.text).context("coordination reply unusable")?;
        let score = required_score(&value, "/finalScore").context("coordination reply unusable")?;
        let summary = CoordinationSummary {
            reasoning: optional_string(&value, "reasoning")
                .unwrap_or_else(|| "No coordinator reasoning provided.".to_string()),
            brand_value: optional_string(&value, "brandValue").unwrap_or_default(),
            recommendations: string_list(&value, "recommendations"),
        };
        Ok((score, summary))
    }

    async fn rerun_without_context(
        &self,
        tracker: &mut PhaseTracker,
        request: Arc<EvaluationRequest>,
    ) -> AgentSlots {
        tracker.advance(RunPhase::RunningCoreAgents);
        let ctx = Arc::new(EvaluationContext::new(request));
        let agents = run_core_batch(self.core_agents(), ctx, self.agent_timeout).await;
        tracker.advance(RunPhase::Aggregating);
        agents
    }

    fn fallback_record(
        &self,
        mut tracker: PhaseTracker,
        agents: AgentSlots,
        brand: AgentResult,
        vision: Option<AgentResult>,
        cause: String,
        started: Instant,
    ) -> EvaluationRecord {
        let aggregation_formula = format!(
            "Fallback evaluation due to multi-agent failure: {}",
            self.fallback_weights.formula()
        );

        let (final_score, status, error) = if agents.all_failed() {
            tracker.advance(RunPhase::Failed);
            (
                0,
                RunStatus::Failed,
                format!("{cause}; fallback evaluation failed: all agents failed"),
            )
        } else {
            tracker.advance(RunPhase::Completed);
            (
                fallback_score(&agents, &self.fallback_weights),
                RunStatus::Completed,
                cause,
            )
        };
        debug_assert!(tracker.phase().is_terminal());

        let total = millis(started.elapsed());
        tracing::info!(
            run_id = tracker.run_id(),
            final_score,
            total_ms = total,
            status = ?status,
            "Fallback evaluation finished"
        );

        EvaluationRecord {
            run_id: tracker.run_id().to_string(),
            agents,
            brand_alignment: Some(brand),
            vision,
            coordination: None,
            final_score,
            aggregation_formula,
            total_execution_time_ms: total,
            status,
            error: Some(error),
        }
    }
}

impl Orchestrator for BrandFirstOrchestrator {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::BrandFirst
    }

    fn evaluate<'a>(
        &'a self,
        request: EvaluationRequest,
    ) -> Pin<Box<dyn Future<Output = EvaluationRecord> + Send + 'a>> {
        Box::pin(self.run(request))
    }
}

/// Fixed formula over raw scores. Failed agents contribute their score of 0.
pub fn fallback_score(agents: &AgentSlots, weights: &FallbackWeights) -> u8 {
    let total: f64 = agents
        .as_array()
        .into_iter()
        .zip(weights.as_array())
        .map(|(result, weight)| weight * f64::from(result.score))
        .sum();
    clamp_score(total)
}

fn coordination_prompt(
    request: &EvaluationRequest,
    brand: &AgentResult,
    agents: &AgentSlots,
) -> String {
    format!(
        r#"You are an evaluation coordinator. Review all the agent results and determine how well the generated image serves the brand's objectives and creates value.

Brand: {brand_name}
Channel: {channel}
Original Prompt: "{prompt}"

Brand context (from Brand Alignment Agent):
{brand_score}/100 - {brand_reasoning}

Core agent results:
- Size Compliance: {size_score}/100 - {size_reasoning}
- Content Quality: {content_score}/100 - {content_reasoning}
- Creativity: {creativity_score}/100 - {creativity_reasoning}
- Mood Consistency: {mood_score}/100 - {mood_reasoning}

Evaluation task:
Based on the brand alignment assessment and the 4 core evaluations, determine:
1. How well does this image match what the brand is asking for?
2. Does it create value for the brand (engagement, perception, positioning)?
3. What is the overall effectiveness for the brand's goals?

Consider the brand's vision, voice, target audience, and market positioning when calculating the final score.

Format your response as JSON:
{{
  "finalScore": number,
  "reasoning": "string",
  "brandValue": "string",
  "recommendations": ["string"]
}}"#,
        brand_name = request.brand.name,
        channel = request.channel,
        prompt = request.prompt,
        brand_score = brand.score,
        brand_reasoning = brand.reasoning,
        size_score = agents.size_compliance.score,
        size_reasoning = agents.size_compliance.reasoning,
        content_score = agents.subject_adherence.score,
        content_reasoning = agents.subject_adherence.reasoning,
        creativity_score = agents.creativity.score,
        creativity_reasoning = agents.creativity.reasoning,
        mood_score = agents.mood_consistency.score,
        mood_reasoning = agents.mood_consistency.reasoning,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{ScriptedProvider, gateway_with, request_with};
    use crate::evaluation::{AgentStatus, Channel};

    fn slots(scores: [f64; 4]) -> AgentSlots {
        let [a, b, c, d] = scores.map(|s| AgentResult::success(s, "ok", Duration::ZERO));
        AgentSlots {
            size_compliance: a,
            subject_adherence: b,
            creativity: c,
            mood_consistency: d,
        }
    }

    #[test]
    fn fallback_formula_uses_raw_scores() {
        // 0.25*80 + 0.40*0 + 0.20*70 + 0.15*60 = 20 + 14 + 9
        let mut agents = slots([80.0, 0.0, 70.0, 60.0]);
        agents.subject_adherence = AgentResult::failure("content quality", "down", Duration::ZERO);
        assert_eq!(fallback_score(&agents, &FallbackWeights::default()), 43);
    }

    #[test]
    fn coordination_prompt_lists_every_agent() {
        let request = request_with(Channel::TikTok, "skater at sunset");
        let brand = AgentResult::success(77.0, "Solid fit", Duration::ZERO);
        let prompt = coordination_prompt(&request, &brand, &slots([90.0, 80.0, 70.0, 60.0]));
        assert!(prompt.contains("77/100 - Solid fit"));
        assert!(prompt.contains("- Size Compliance: 90/100"));
        assert!(prompt.contains("- Content Quality: 80/100"));
        assert!(prompt.contains("- Mood Consistency: 60/100"));
        assert!(prompt.contains("Channel: TikTok"));
    }

    #[tokio::test]
    async fn scripted_gateway_drives_full_brand_first_run() {
        // Every LLM agent and the coordinator receive the same reply, which
        // satisfies all three contracts.
        let provider = ScriptedProvider::replying(
            r#"{"finalScore": 84, "reasoning": "Cohesive and on-brand.",
                "brandValue": "Reinforces premium feel", "brandImpact": "Positive",
                "overallAssessment": "Good", "recommendations": ["Crop tighter"]}"#,
        );
        let orchestrator = BrandFirstOrchestrator::new(
            &OrchestratorConfig::default(),
            Arc::new(gateway_with(&provider)),
        );

        let record = orchestrator
            .run(request_with(Channel::Instagram, "espresso pour, moody light"))
            .await;

        assert_eq!(record.status, RunStatus::Completed);
        assert_eq!(record.final_score, 84);
        assert!(record.error.is_none());
        assert_eq!(
            record.aggregation_formula,
            "Brand-first multi-agent evaluation with 4 core agents: Cohesive and on-brand."
        );
        let brand = record.brand_alignment.unwrap();
        assert_eq!(brand.status, AgentStatus::Success);
        assert_eq!(brand.score, 84);
        let coordination = record.coordination.unwrap();
        assert_eq!(coordination.brand_value, "Reinforces premium feel");
        assert_eq!(coordination.recommendations, vec!["Crop tighter"]);
        assert_eq!(record.agents.subject_adherence.reasoning, "Good");
    }

    #[tokio::test]
    async fn gateway_outage_degrades_to_fallback_formula() {
        let provider = ScriptedProvider::failing("service unavailable");
        let orchestrator = BrandFirstOrchestrator::new(
            &OrchestratorConfig::default(),
            Arc::new(gateway_with(&provider)),
        );

        let record = orchestrator
            .run(request_with(Channel::Instagram, "espresso pour, moody light"))
            .await;

        assert_eq!(record.status, RunStatus::Completed);
        assert!(record.error.as_deref().unwrap().contains("service unavailable"));
        assert!(record.coordination.is_none());
        assert_eq!(record.agents.subject_adherence.status, AgentStatus::Error);
        assert_eq!(
            record.final_score,
            fallback_score(&record.agents, &FallbackWeights::default())
        );
        assert_eq!(
            record.aggregation_formula,
            "Fallback evaluation due to multi-agent failure: 0.25*size + 0.40*content + 0.20*creativity + 0.15*mood"
        );
    }
}
