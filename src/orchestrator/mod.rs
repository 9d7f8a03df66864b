//! Aggregation strategies.
//!
//! Both strategies sit behind [`Orchestrator`] and are picked from config by
//! [`create_orchestrator`]. Neither returns an error: every failure ends up
//! as data on the [`EvaluationRecord`].

pub mod brand_first;
pub mod deadline;
pub mod fixed_weight;

pub use brand_first::BrandFirstOrchestrator;
pub use deadline::run_with_deadline;
pub use fixed_weight::FixedWeightOrchestrator;

use crate::agents::{Agent, EvaluationContext};
use crate::config::{Config, StrategyKind};
use crate::evaluation::{AgentResult, AgentSlots, EvaluationRecord, EvaluationRequest};
use crate::llm::LlmGateway;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub trait Orchestrator: Send + Sync {
    fn strategy(&self) -> StrategyKind;

    /// Score one request. Always yields a record, never an error.
    fn evaluate<'a>(
        &'a self,
        request: EvaluationRequest,
    ) -> Pin<Box<dyn Future<Output = EvaluationRecord> + Send + 'a>>;
}

pub fn create_orchestrator(config: &Config, gateway: Arc<LlmGateway>) -> Box<dyn Orchestrator> {
    match config.orchestrator.strategy {
        StrategyKind::FixedWeight => Box::new(FixedWeightOrchestrator::new(
            &config.orchestrator,
            gateway,
        )),
        StrategyKind::BrandFirst => {
            Box::new(BrandFirstOrchestrator::new(&config.orchestrator, gateway))
        }
    }
}

pub(crate) fn new_run_id() -> String {
    format!("eval_{}", Uuid::new_v4().simple())
}

/// Run four agents concurrently, each under its own deadline, in slot order
/// size, subject/content, creativity, mood.
pub(crate) async fn run_core_batch(
    agents: [Agent; 4],
    ctx: Arc<EvaluationContext>,
    timeout: Duration,
) -> AgentSlots {
    let [size, subject, creativity, mood] = agents;
    let (size_compliance, subject_adherence, creativity, mood_consistency) = tokio::join!(
        run_with_deadline(size, Arc::clone(&ctx), timeout),
        run_with_deadline(subject, Arc::clone(&ctx), timeout),
        run_with_deadline(creativity, Arc::clone(&ctx), timeout),
        run_with_deadline(mood, Arc::clone(&ctx), timeout),
    );
    AgentSlots {
        size_compliance,
        subject_adherence,
        creativity,
        mood_consistency,
    }
}

/// Vision pass, only when the caller supplied image bytes.
pub(crate) async fn run_vision(
    gateway: &Arc<LlmGateway>,
    ctx: &Arc<EvaluationContext>,
    timeout: Duration,
) -> Option<AgentResult> {
    if ctx.request.image.is_none() {
        return None;
    }
    Some(run_with_deadline(Agent::Vision(Arc::clone(gateway)), Arc::clone(ctx), timeout).await)
}
