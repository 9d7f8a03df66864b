use super::Assessment;
use super::llm_json::{optional_string, parse_json_object, required_score, weighted_criteria};
use crate::error::AgentError;
use crate::evaluation::{BrandContext, EvaluationRequest};
use crate::llm::{GenerateOptions, LlmGateway, ProviderMessage};
use serde_json::json;
use std::fmt::Write as _;

pub const CRITERIA_WEIGHTS: &[(&str, f64)] = &[
    ("promptAdherence", 0.35),
    ("technicalQuality", 0.25),
    ("compositionClarity", 0.20),
    ("brandFit", 0.20),
];

const SYSTEM_PROMPT: &str =
    "You are an expert creative director reviewing generated marketing content. Always respond with valid JSON.";

fn build_prompt(request: &EvaluationRequest, brand_context: Option<&BrandContext>) -> String {
    let brand = &request.brand;
    let mut prompt = format!(
        r#"Assess how well this generated content delivers on its prompt and how production-ready it is.

Content context:
- Channel: {channel}
- Original Prompt: "{prompt}"
- Generator: {model}
- Brand: {name} ({style})
"#,
        channel = request.channel,
        prompt = request.prompt,
        model = request.model_id,
        name = brand.name,
        style = brand.style,
    );

    if let Some(ctx) = brand_context {
        let _ = write!(
            prompt,
            "\nBrand alignment already assessed at {}/100: {}\n",
            ctx.alignment_score, ctx.alignment_reasoning
        );
        if !ctx.recommendations.is_empty() {
            let _ = writeln!(prompt, "Brand recommendations: {}", ctx.recommendations.join("; "));
        }
        prompt.push_str("Take this brand assessment into account when judging brand fit.\n");
    }

    prompt.push_str(
        r#"
Criteria:
1. Prompt Adherence (35%): Does the content depict what the prompt asks for?
2. Technical Quality (25%): Resolution, artifacts, rendering fidelity.
3. Composition Clarity (20%): Is the subject clear and the layout readable?
4. Brand Fit (20%): Would this sit naturally in the brand's feed?

Format your response as JSON:
{
  "criteria": {
    "promptAdherence": { "score": number, "reasoning": "string" },
    "technicalQuality": { "score": number, "reasoning": "string" },
    "compositionClarity": { "score": number, "reasoning": "string" },
    "brandFit": { "score": number, "reasoning": "string" }
  },
  "overallAssessment": "string",
  "finalScore": number
}"#,
    );
    prompt
}

pub(super) async fn assess(
    gateway: &LlmGateway,
    request: &EvaluationRequest,
    brand_context: Option<&BrandContext>,
) -> Result<Assessment, AgentError> {
    let messages = [
        ProviderMessage::system(SYSTEM_PROMPT),
        ProviderMessage::user(build_prompt(request, brand_context)),
    ];
    let options = GenerateOptions::text().json();
    let response = gateway.generate_text(&messages, &options).await?;

    let value = parse_json_object(&response.text)?;
    let final_score = required_score(&value, "/finalScore")?;
    let weighted = weighted_criteria(&value, CRITERIA_WEIGHTS).ok();
    let reasoning = optional_string(&value, "overallAssessment")
        .unwrap_or_else(|| format!("Content quality rated {final_score:.0}/100."));

    Ok(Assessment {
        score: final_score,
        reasoning,
        details: json!({
            "criteria": value.get("criteria"),
            "weightedScore": weighted,
            "brandContextUsed": brand_context.is_some(),
            "provider": response.provider,
            "model": response.model,
            "usage": response.usage,
        }),
    })
}
