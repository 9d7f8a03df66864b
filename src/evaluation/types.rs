use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ── Request side ─────────────────────────────────────────────────────────────

/// Target publishing platform. Unrecognised names are kept verbatim and
/// scored against the generic size profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Instagram,
    TikTok,
    LinkedIn,
    Facebook,
    Other(String),
}

impl From<String> for Channel {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "instagram" => Self::Instagram,
            "tiktok" => Self::TikTok,
            "linkedin" => Self::LinkedIn,
            "facebook" => Self::Facebook,
            _ => Self::Other(raw),
        }
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.to_string()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instagram => f.write_str("Instagram"),
            Self::TikTok => f.write_str("TikTok"),
            Self::LinkedIn => f.write_str("LinkedIn"),
            Self::Facebook => f.write_str("Facebook"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub colors: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Seconds, for video assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Base64 image handed in by the caller for vision scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub asset_path: String,
    pub prompt: String,
    pub model_id: String,
    pub channel: Channel,
    pub brand: BrandProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MediaMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl EvaluationRequest {
    /// Width and height, only when both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let meta = self.metadata.as_ref()?;
        match (meta.width, meta.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Output of the brand-alignment pass, visible to later agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandContext {
    pub alignment_score: u8,
    pub alignment_reasoning: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

// ── Result side ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Success,
    Error,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub score: u8,
    pub reasoning: String,
    pub execution_time_ms: u64,
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl AgentResult {
    /// Successful result. Score is clamped to 0..=100 and an empty reasoning
    /// is replaced so the string is never blank.
    pub fn success(score: f64, reasoning: impl Into<String>, elapsed: Duration) -> Self {
        let reasoning = reasoning.into();
        Self {
            score: clamp_score(score),
            reasoning: if reasoning.trim().is_empty() {
                "No reasoning provided.".into()
            } else {
                reasoning
            },
            execution_time_ms: millis(elapsed),
            status: AgentStatus::Success,
            error: None,
            details: None,
        }
    }

    /// Score-0 error result. `label` names the dimension, e.g. "brand alignment".
    pub fn failure(label: &str, error: impl fmt::Display, elapsed: Duration) -> Self {
        let message = error.to_string();
        Self {
            score: 0,
            reasoning: format!("Error evaluating {label}: {message}"),
            execution_time_ms: millis(elapsed),
            status: AgentStatus::Error,
            error: Some(message),
            details: None,
        }
    }

    /// Substituted when an agent misses its deadline.
    pub fn timed_out(agent: &str, timeout: Duration) -> Self {
        let message = format!("{agent} timeout after {}ms", millis(timeout));
        Self {
            score: 0,
            reasoning: format!("Agent failed: {message}"),
            execution_time_ms: millis(timeout),
            status: AgentStatus::Timeout,
            error: Some(message),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == AgentStatus::Success
    }
}

/// Round and clamp any intermediate score into the public 0..=100 range.
pub fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    // Clamped first, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = score.round().clamp(0.0, 100.0) as u8;
    rounded
}

/// The four core slots every record carries. Brand-first runs put the
/// LLM content-quality result in `subject_adherence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSlots {
    #[serde(rename = "sizeComplianceAgent")]
    pub size_compliance: AgentResult,
    #[serde(rename = "subjectAdherenceAgent")]
    pub subject_adherence: AgentResult,
    #[serde(rename = "creativityAgent")]
    pub creativity: AgentResult,
    #[serde(rename = "moodConsistencyAgent")]
    pub mood_consistency: AgentResult,
}

impl AgentSlots {
    pub fn as_array(&self) -> [&AgentResult; 4] {
        [
            &self.size_compliance,
            &self.subject_adherence,
            &self.creativity,
            &self.mood_consistency,
        ]
    }

    pub fn all_failed(&self) -> bool {
        self.as_array().iter().all(|r| !r.is_success())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Holistic verdict of the brand-first coordination pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationSummary {
    pub reasoning: String,
    #[serde(default)]
    pub brand_value: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub run_id: String,
    pub agents: AgentSlots,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_alignment: Option<AgentResult>,
    /// Supplementary pixel-level assessment, reported but not weighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination: Option<CoordinationSummary>,
    pub final_score: u8,
    pub aggregation_formula: String,
    pub total_execution_time_ms: u64,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
