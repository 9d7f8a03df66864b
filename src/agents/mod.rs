//! Scoring agents.
//!
//! Four keyword heuristics (size, subject adherence, creativity, mood) run
//! without network access. Three LLM-backed scorers (brand alignment,
//! content quality, vision) go through the [`LlmGateway`]. Every agent
//! produces an [`AgentResult`]; failures are converted into score-0 results
//! at this boundary and never propagate as errors.

pub mod brand_alignment;
pub mod content_quality;
pub mod creativity;
pub mod llm_json;
pub mod mood;
pub mod scoring;
pub mod size;
pub mod subject;
pub mod vision;

use crate::evaluation::{AgentResult, BrandContext, EvaluationRequest};
use crate::llm::LlmGateway;
use std::sync::Arc;
use std::time::Instant;

/// Intermediate output of one agent before it is stamped with timing and status.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub score: f64,
    pub reasoning: String,
    pub details: serde_json::Value,
}

/// Everything an agent can see for one run.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub request: Arc<EvaluationRequest>,
    pub brand_context: Option<BrandContext>,
}

impl EvaluationContext {
    pub fn new(request: Arc<EvaluationRequest>) -> Self {
        Self {
            request,
            brand_context: None,
        }
    }

    #[must_use]
    pub fn with_brand_context(mut self, brand_context: Option<BrandContext>) -> Self {
        self.brand_context = brand_context;
        self
    }
}

#[derive(Clone)]
pub enum Agent {
    SizeCompliance,
    SubjectAdherence,
    Creativity,
    MoodConsistency,
    BrandAlignment(Arc<LlmGateway>),
    ContentQuality(Arc<LlmGateway>),
    Vision(Arc<LlmGateway>),
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Agent {
    /// Display name used in logs and timeout messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SizeCompliance => "Size Compliance Agent",
            Self::SubjectAdherence => "Subject Adherence Agent",
            Self::Creativity => "Creativity Agent",
            Self::MoodConsistency => "Mood Consistency Agent",
            Self::BrandAlignment(_) => "Brand Alignment Agent",
            Self::ContentQuality(_) => "Content Quality Agent",
            Self::Vision(_) => "Vision Agent",
        }
    }

    /// Dimension name used in failure reasoning.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SizeCompliance => "size compliance",
            Self::SubjectAdherence => "subject adherence",
            Self::Creativity => "creativity",
            Self::MoodConsistency => "mood consistency",
            Self::BrandAlignment(_) => "brand alignment",
            Self::ContentQuality(_) => "content quality",
            Self::Vision(_) => "image with vision",
        }
    }

    /// Score the request. Never fails: errors become score-0 results.
    pub async fn evaluate(&self, ctx: &EvaluationContext) -> AgentResult {
        let started = Instant::now();
        let request = ctx.request.as_ref();

        let outcome = match self {
            Self::SizeCompliance => Ok(size::assess(request)),
            Self::SubjectAdherence => Ok(subject::assess(request)),
            Self::Creativity => Ok(creativity::assess(request)),
            Self::MoodConsistency => Ok(mood::assess(request)),
            Self::BrandAlignment(gateway) => brand_alignment::assess(gateway, request).await,
            Self::ContentQuality(gateway) => {
                content_quality::assess(gateway, request, ctx.brand_context.as_ref()).await
            }
            Self::Vision(gateway) => vision::assess(gateway, request).await,
        };

        let elapsed = started.elapsed();
        match outcome {
            Ok(assessment) => {
                tracing::debug!(
                    agent = self.name(),
                    score = assessment.score,
                    elapsed_ms = elapsed.as_millis(),
                    "Agent finished"
                );
                AgentResult::success(assessment.score, assessment.reasoning, elapsed)
                    .with_details(assessment.details)
            }
            Err(e) => {
                tracing::warn!(agent = self.name(), error = %e, "Agent failed");
                AgentResult::failure(self.label(), e, elapsed)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::evaluation::{BrandProfile, Channel, EvaluationRequest};
    use crate::llm::{
        GenerateOptions, LlmGateway, Provider, ProviderCapabilities, ProviderMessage,
        ProviderResponse,
    };
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    pub fn request_with(channel: Channel, prompt: &str) -> EvaluationRequest {
        EvaluationRequest {
            asset_path: "uploads/test.png".into(),
            prompt: prompt.into(),
            model_id: "midjourney-v6".into(),
            channel,
            brand: BrandProfile {
                name: "Acme".into(),
                description: String::new(),
                style: String::new(),
                vision: String::new(),
                voice: String::new(),
                colors: String::new(),
            },
            metadata: None,
            image: None,
        }
    }

    /// Vision-capable provider that answers every call with the same text
    /// and remembers what it was sent.
    pub struct ScriptedProvider {
        reply: Result<String, String>,
        last: Mutex<Option<(Vec<ProviderMessage>, GenerateOptions)>>,
    }

    impl ScriptedProvider {
        pub fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                last: Mutex::new(None),
            })
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                last: Mutex::new(None),
            })
        }

        pub fn last_messages(&self) -> Vec<ProviderMessage> {
            self.last
                .lock()
                .unwrap()
                .as_ref()
                .map(|(m, _)| m.clone())
                .unwrap_or_default()
        }

        pub fn last_options(&self) -> Option<GenerateOptions> {
            self.last.lock().unwrap().as_ref().map(|(_, o)| o.clone())
        }
    }

    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities { vision: true }
        }

        fn default_model(&self, vision: bool) -> &str {
            if vision { "scripted-vision" } else { "scripted-text" }
        }

        fn generate<'a>(
            &'a self,
            messages: &'a [ProviderMessage],
            options: &'a GenerateOptions,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
            Box::pin(async move {
                *self.last.lock().unwrap() = Some((messages.to_vec(), options.clone()));
                match &self.reply {
                    Ok(text) => Ok(ProviderResponse::new(
                        "scripted",
                        self.default_model(messages.iter().any(ProviderMessage::has_image)),
                        text.clone(),
                    )),
                    Err(message) => Err(anyhow::anyhow!("{message}")),
                }
            })
        }
    }

    pub fn gateway_with(provider: &Arc<ScriptedProvider>) -> LlmGateway {
        let provider: Arc<dyn Provider> = provider.clone();
        LlmGateway::new(vec![("scripted".into(), Some(provider))])
    }
}
