use super::Assessment;
use super::llm_json::{
    optional_string, parse_json_object, required_score, string_list, weighted_criteria,
};
use crate::error::AgentError;
use crate::evaluation::{BrandContext, EvaluationRequest};
use crate::llm::{GenerateOptions, LlmGateway, ProviderMessage};
use serde_json::json;

pub const CRITERIA_WEIGHTS: &[(&str, f64)] = &[
    ("visualIdentity", 0.25),
    ("brandVoice", 0.20),
    ("brandValues", 0.20),
    ("audienceAlignment", 0.15),
    ("marketPositioning", 0.20),
];

const SYSTEM_PROMPT: &str =
    "You are a senior brand strategist evaluating content alignment. Always respond with valid JSON.";

fn build_prompt(request: &EvaluationRequest) -> String {
    let brand = &request.brand;
    format!(
        r#"You are a brand strategy expert. Evaluate how well this generated image aligns with the brand's core identity, values, and positioning.

Brand identity assessment:
1. Visual Identity (25%): How well does the image reflect brand colors, style, and visual language?
2. Brand Voice & Tone (20%): Does the image communicate the brand's personality and voice?
3. Brand Values (20%): Does the image embody the brand's core values and mission?
4. Target Audience Alignment (15%): Is this appropriate for the brand's target demographic?
5. Market Positioning (20%): Does this strengthen the brand's position in its market?

Content context:
- Channel: {channel}
- Original Prompt: "{prompt}"
- Brand: {name}

Brand profile:
- Style: {style}
- Colors: {colors}
- Vision: {vision}
- Voice: {voice}
- Description: {description}

Analyze whether this image would strengthen or weaken the brand's market position and customer perception. Consider long-term brand equity impact.

Format your response as JSON:
{{
  "criteria": {{
    "visualIdentity": {{ "score": number, "reasoning": "string" }},
    "brandVoice": {{ "score": number, "reasoning": "string" }},
    "brandValues": {{ "score": number, "reasoning": "string" }},
    "audienceAlignment": {{ "score": number, "reasoning": "string" }},
    "marketPositioning": {{ "score": number, "reasoning": "string" }}
  }},
  "overallAlignment": number,
  "brandImpact": "string",
  "recommendations": ["string"],
  "finalScore": number
}}"#,
        channel = request.channel,
        prompt = request.prompt,
        name = brand.name,
        style = brand.style,
        colors = brand.colors,
        vision = brand.vision,
        voice = brand.voice,
        description = brand.description,
    )
}

pub(super) async fn assess(
    gateway: &LlmGateway,
    request: &EvaluationRequest,
) -> Result<Assessment, AgentError> {
    let messages = [
        ProviderMessage::system(SYSTEM_PROMPT),
        ProviderMessage::user(build_prompt(request)),
    ];
    let options = GenerateOptions::text().json().with_max_tokens(1200);
    let response = gateway.generate_text(&messages, &options).await?;

    let value = parse_json_object(&response.text)?;
    let final_score = required_score(&value, "/finalScore")?;
    let weighted = weighted_criteria(&value, CRITERIA_WEIGHTS).ok();
    if let Some(local) = weighted
        && (local - final_score).abs() > 15.0
    {
        tracing::debug!(
            model_score = final_score,
            weighted_score = local,
            "Brand alignment final score diverges from its sub-criteria"
        );
    }

    let reasoning = optional_string(&value, "brandImpact")
        .unwrap_or_else(|| format!("Brand alignment rated {final_score:.0}/100."));

    Ok(Assessment {
        score: final_score,
        reasoning,
        details: json!({
            "criteria": value.get("criteria"),
            "overallAlignment": value.get("overallAlignment"),
            "recommendations": string_list(&value, "recommendations"),
            "weightedScore": weighted,
            "provider": response.provider,
            "model": response.model,
            "usage": response.usage,
        }),
    })
}

/// Context handed to the core agents after a successful brand pass.
pub fn brand_context_from(score: u8, reasoning: &str, details: Option<&serde_json::Value>) -> BrandContext {
    BrandContext {
        alignment_score: score,
        alignment_reasoning: reasoning.to_string(),
        recommendations: details
            .map(|d| string_list(d, "recommendations"))
            .unwrap_or_default(),
    }
}
