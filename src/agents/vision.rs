use super::Assessment;
use super::llm_json::{optional_string, parse_json_object, required_score, weighted_criteria};
use crate::error::AgentError;
use crate::evaluation::EvaluationRequest;
use crate::llm::{GenerateOptions, ImageSource, LlmGateway, ProviderMessage};
use serde_json::json;

pub const CRITERIA_WEIGHTS: &[(&str, f64)] = &[
    ("visualBrandAlignment", 0.30),
    ("contentQuality", 0.25),
    ("subjectAccuracy", 0.25),
    ("brandMessageCommunication", 0.20),
];

fn build_prompt(request: &EvaluationRequest) -> String {
    let brand = &request.brand;
    format!(
        r#"You are an expert image evaluator for brand content. Analyze this image based on the following criteria:

Brand information:
- Name: {name}
- Style: {style}
- Colors: {colors}
- Vision: {vision}
- Voice: {voice}

Original Prompt: "{prompt}"

Channel: {channel}

Evaluate the image on these aspects:
1. Visual Brand Alignment (30%): How well does the image match the brand's visual style, colors, and aesthetic?
2. Content Quality (25%): Technical quality, composition, lighting, and overall visual appeal?
3. Subject Accuracy (25%): How accurately does the image represent what was requested in the prompt?
4. Brand Message Communication (20%): How effectively does the image communicate the brand's vision and voice?

Format your response as JSON:
{{
  "criteria": {{
    "visualBrandAlignment": {{ "score": number, "reasoning": "string" }},
    "contentQuality": {{ "score": number, "reasoning": "string" }},
    "subjectAccuracy": {{ "score": number, "reasoning": "string" }},
    "brandMessageCommunication": {{ "score": number, "reasoning": "string" }}
  }},
  "overallAssessment": "string",
  "finalScore": number
}}"#,
        name = brand.name,
        style = brand.style,
        colors = brand.colors,
        vision = brand.vision,
        voice = brand.voice,
        prompt = request.prompt,
        channel = request.channel,
    )
}

/// Scores the actual pixels. The final score is recomputed from the
/// sub-criteria; the model's own `finalScore` is only kept for reference.
pub(super) async fn assess(
    gateway: &LlmGateway,
    request: &EvaluationRequest,
) -> Result<Assessment, AgentError> {
    let image = request.image.as_ref().ok_or(AgentError::MissingImage)?;
    let messages = [ProviderMessage::user_with_image(
        build_prompt(request),
        ImageSource::base64(&image.mime_type, &image.data),
    )];
    let options = GenerateOptions::vision().json();
    let response = gateway.generate_with_vision(&messages, &options).await?;

    let value = parse_json_object(&response.text)?;
    let score = weighted_criteria(&value, CRITERIA_WEIGHTS)?;
    let reasoning = optional_string(&value, "overallAssessment")
        .unwrap_or_else(|| format!("Visual evaluation rated {score:.0}/100."));

    Ok(Assessment {
        score,
        reasoning,
        details: json!({
            "criteria": value.get("criteria"),
            "modelFinalScore": required_score(&value, "/finalScore").ok(),
            "provider": response.provider,
            "model": response.model,
            "usage": response.usage,
        }),
    })
}
