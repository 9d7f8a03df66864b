use crate::agents::{Agent, EvaluationContext};
use crate::evaluation::AgentResult;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Run one agent as its own task, raced against `timeout`.
///
/// On expiry the task is aborted and a timeout result substituted. Abort
/// drops the in-flight future at its next await point, so a pending HTTP
/// request is cancelled with it. A panicking agent becomes an error result.
/// A zero budget is already spent, so the agent is never started.
pub async fn run_with_deadline(
    agent: Agent,
    ctx: Arc<EvaluationContext>,
    timeout: Duration,
) -> AgentResult {
    let name = agent.name();
    let label = agent.label();
    let started = Instant::now();

    if timeout.is_zero() {
        tracing::warn!(agent = name, "Agent has no time budget; skipped");
        return AgentResult::timed_out(name, timeout);
    }

    let mut handle = tokio::spawn(async move { agent.evaluate(&ctx).await });

    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            tracing::error!(agent = name, error = %join_err, "Agent task did not complete");
            AgentResult::failure(label, format!("agent task failed: {join_err}"), started.elapsed())
        }
        Err(_) => {
            handle.abort();
            tracing::warn!(
                agent = name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "Agent exceeded its deadline"
            );
            AgentResult::timed_out(name, timeout)
        }
    }
}
