#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use brandlens::evaluation::{BrandProfile, Channel, EvaluationRequest, MediaMetadata};
use brandlens::llm::{
    GenerateOptions, LlmGateway, Provider, ProviderCapabilities, ProviderMessage, ProviderResponse,
};

/// Which scorer a prompt belongs to, recognised by its opening line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Brand,
    Content,
    Vision,
    Coordinator,
}

impl Route {
    fn detect(messages: &[ProviderMessage]) -> Option<Self> {
        let text: String = messages.iter().map(ProviderMessage::text).collect();
        if text.contains("evaluation coordinator") {
            Some(Self::Coordinator)
        } else if text.contains("brand strategy expert") {
            Some(Self::Brand)
        } else if text.contains("expert image evaluator") {
            Some(Self::Vision)
        } else if text.contains("production-ready") {
            Some(Self::Content)
        } else {
            None
        }
    }
}

pub const BRAND_REPLY: &str = r#"{
  "criteria": {
    "visualIdentity": {"score": 85, "reasoning": "Palette matches"},
    "brandVoice": {"score": 80, "reasoning": "Energetic"},
    "brandValues": {"score": 75, "reasoning": "Empowering"},
    "audienceAlignment": {"score": 80, "reasoning": "Young athletes"},
    "marketPositioning": {"score": 70, "reasoning": "Competitive"}
  },
  "overallAlignment": 78,
  "brandImpact": "Reinforces the high-energy positioning.",
  "recommendations": ["Add brand orange accents"],
  "finalScore": 78
}"#;

pub const CONTENT_REPLY: &str = r#"{
  "criteria": {
    "promptAdherence": {"score": 90, "reasoning": "On prompt"},
    "technicalQuality": {"score": 80, "reasoning": "Sharp"},
    "compositionClarity": {"score": 70, "reasoning": "Busy background"},
    "brandFit": {"score": 80, "reasoning": "Fits"}
  },
  "overallAssessment": "Delivers the requested scene with minor clutter.",
  "finalScore": 82
}"#;

pub const VISION_REPLY: &str = r#"{
  "criteria": {
    "visualBrandAlignment": {"score": 80, "reasoning": "a"},
    "contentQuality": {"score": 80, "reasoning": "b"},
    "subjectAccuracy": {"score": 60, "reasoning": "c"},
    "brandMessageCommunication": {"score": 70, "reasoning": "d"}
  },
  "overallAssessment": "Readable product shot.",
  "finalScore": 75
}"#;

pub const COORDINATOR_REPLY: &str = r#"Here is my verdict:
```json
{
  "finalScore": 81,
  "reasoning": "Strong brand fit with solid execution.",
  "brandValue": "Builds recognition with the core audience.",
  "recommendations": ["Tighten the crop", "Add brand orange accents"]
}
```"#;

/// In-process provider that answers each scorer with its own canned reply,
/// counts calls, and remembers every prompt it was sent.
pub struct MockProvider {
    pub calls: AtomicUsize,
    failing: Vec<Route>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<(Route, String)>>,
}

impl MockProvider {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::build(Vec::new(), None))
    }

    pub fn failing_on(routes: &[Route]) -> Arc<Self> {
        Arc::new(Self::build(routes.to_vec(), None))
    }

    pub fn down() -> Arc<Self> {
        Self::failing_on(&[Route::Brand, Route::Content, Route::Vision, Route::Coordinator])
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(Vec::new(), Some(delay)))
    }

    fn build(failing: Vec<Route>, delay: Option<Duration>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing,
            delay,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts_for(&self, route: Route) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == route)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities { vision: true }
    }

    fn default_model(&self, vision: bool) -> &str {
        if vision { "mock-vision" } else { "mock-text" }
    }

    fn generate<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        _options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let Some(route) = Route::detect(messages) else {
                anyhow::bail!("mock: unrecognised prompt");
            };
            let prompt: String = messages.iter().map(ProviderMessage::text).collect();
            self.prompts.lock().unwrap().push((route, prompt));

            if self.failing.contains(&route) {
                anyhow::bail!("mock: upstream unavailable for {route:?}");
            }
            let reply = match route {
                Route::Brand => BRAND_REPLY,
                Route::Content => CONTENT_REPLY,
                Route::Vision => VISION_REPLY,
                Route::Coordinator => COORDINATOR_REPLY,
            };
            Ok(ProviderResponse::new("mock", "mock-text", reply.to_string()))
        })
    }
}

pub fn gateway(provider: &Arc<MockProvider>) -> Arc<LlmGateway> {
    let provider: Arc<dyn Provider> = provider.clone();
    Arc::new(LlmGateway::new(vec![("mock".into(), Some(provider))]))
}

pub fn pulseforge_request(prompt: &str) -> EvaluationRequest {
    EvaluationRequest {
        asset_path: "uploads/pulseforge-hero.png".into(),
        prompt: prompt.into(),
        model_id: "midjourney-v6".into(),
        channel: Channel::Instagram,
        brand: BrandProfile {
            name: "PulseForge Fitness".into(),
            description: "Performance training gear for competitive athletes".into(),
            style: "bold dynamic".into(),
            vision: "Empower every athlete to push past limits".into(),
            voice: "Energetic, direct, motivating".into(),
            colors: "orange, black".into(),
        },
        metadata: Some(MediaMetadata {
            width: Some(1080),
            height: Some(1080),
            format: Some("png".into()),
            duration: None,
        }),
        image: None,
    }
}
