use super::Assessment;
use super::scoring::{as_f64, clamp_unit, contains_any, count_matches, weighted_score, word_count};
use crate::evaluation::EvaluationRequest;
use serde_json::json;
use std::fmt::Write as _;

const CREATIVE_WORDS: &[&str] = &[
    "unique", "unusual", "extraordinary", "innovative", "creative", "imaginative", "original",
    "distinctive", "unconventional", "artistic", "surreal", "abstract", "experimental",
    "avant-garde", "whimsical",
];

const CLICHE_WORDS: &[&str] = &[
    "stock photo", "generic", "typical", "standard", "basic", "simple", "plain", "ordinary",
    "common", "usual", "normal", "regular",
];

/// Two or more of these themes in one prompt count as an unexpected combination.
const THEMES: &[(&str, &[&str])] = &[
    ("tech", &["robot", "computer", "digital", "cyber", "futuristic", "ai"]),
    ("nature", &["forest", "ocean", "mountain", "flower", "tree", "natural"]),
    ("vintage", &["vintage", "retro", "old", "antique", "classic", "aged"]),
    ("modern", &["modern", "contemporary", "sleek", "minimalist", "clean"]),
];

const ELEMENTS: &[&str] = &[
    "person", "people", "man", "woman", "child", "animal", "dog", "cat", "bird", "tree",
    "flower", "building", "house", "car", "vehicle", "mountain", "river", "ocean", "sky", "cloud",
    "sun", "moon", "star", "furniture", "table", "chair", "lamp", "book", "computer", "phone",
];

const TECH_SPECS: &[&str] = &[
    "8k", "4k", "hd", "uhd", "resolution", "dpi", "megapixel", "iso", "aperture", "shutter",
    "focal length", "lens", "render", "ray tracing", "anti-aliasing", "texture",
];

const COMPOSITION_TERMS: &[&str] = &[
    "composition", "framing", "perspective", "angle", "viewpoint", "rule of thirds", "symmetry",
    "balance", "focal point", "depth",
];

const LIGHTING_TERMS: &[&str] = &[
    "lighting", "light", "shadow", "illumination", "glow", "bright", "dark", "contrast",
    "dramatic lighting", "soft light", "natural light", "golden hour", "backlit", "rim light",
    "ambient",
];

const COLOR_THEORY_TERMS: &[&str] = &[
    "color palette", "vibrant", "muted", "saturated", "desaturated", "warm tones", "cool tones",
    "complementary colors", "monochrome", "color harmony", "gradient", "hue", "tint", "shade",
];

const ART_STYLE_TERMS: &[&str] = &[
    "impressionist", "expressionist", "surrealist", "minimalist", "baroque", "renaissance",
    "modern", "contemporary", "abstract", "realistic", "hyperrealistic", "photorealistic",
    "painterly",
];

/// Known generator capability, matched by case-insensitive substring in table order.
const MODEL_CAPABILITY: &[(&str, f64)] = &[
    ("openai/chatgpt5o", 90.0),
    ("openai/chatgpt-4", 85.0),
    ("google/gemini2.5-pro", 88.0),
    ("google/gemini-pro", 82.0),
    ("anthropic/claude-3", 85.0),
    ("midjourney", 95.0),
    ("stable-diffusion", 80.0),
    ("dall-e-3", 88.0),
    ("deepseek", 75.0),
];

const DEFAULT_MODEL_CAPABILITY: f64 = 70.0;

pub fn has_unexpected_combination(prompt: &str) -> bool {
    THEMES
        .iter()
        .filter(|(_, words)| contains_any(prompt, words))
        .count()
        >= 2
}

pub fn originality(prompt: &str) -> f64 {
    let mut score = 60.0;
    score += as_f64(count_matches(prompt, CREATIVE_WORDS)) * 8.0;
    score -= as_f64(count_matches(prompt, CLICHE_WORDS)) * 10.0;
    if has_unexpected_combination(prompt) {
        score += 15.0;
    }
    clamp_unit(score)
}

pub fn complexity(prompt: &str, width: Option<u32>) -> f64 {
    let mut score = 50.0;
    score += match word_count(prompt) {
        w if w > 30 => 25.0,
        w if w > 20 => 20.0,
        w if w > 10 => 10.0,
        w if w < 5 => -10.0,
        _ => 0.0,
    };
    score += f64::min(as_f64(count_matches(prompt, ELEMENTS)) * 5.0, 25.0);
    if contains_any(prompt, TECH_SPECS) {
        score += 10.0;
    }
    if width.is_some_and(|w| w > 2000) {
        score += 5.0;
    }
    if contains_any(prompt, &["8k", "4k", "high resolution"]) {
        score += 5.0;
    }
    clamp_unit(score)
}

pub fn artistic_elements(prompt: &str) -> f64 {
    let score = 50.0
        + as_f64(count_matches(prompt, COMPOSITION_TERMS)) * 10.0
        + as_f64(count_matches(prompt, LIGHTING_TERMS)) * 8.0
        + as_f64(count_matches(prompt, COLOR_THEORY_TERMS)) * 8.0
        + as_f64(count_matches(prompt, ART_STYLE_TERMS)) * 7.0;
    clamp_unit(score)
}

pub fn model_capability(model_id: &str, prompt: &str) -> f64 {
    let model = model_id.to_lowercase();
    let mut score = MODEL_CAPABILITY
        .iter()
        .find(|(key, _)| model.contains(key))
        .map_or(DEFAULT_MODEL_CAPABILITY, |(_, v)| *v);

    let words = word_count(prompt);
    if words > 25 && score >= 85.0 {
        score += 5.0;
    } else if words < 10 && score < 80.0 {
        score -= 5.0;
    }
    clamp_unit(score)
}

fn reasoning(originality: f64, complexity: f64, artistic: f64, model: f64, model_id: &str) -> String {
    let mut out = String::new();
    out.push_str(if originality >= 80.0 {
        "Highly original and creative concept. "
    } else if originality >= 60.0 {
        "Moderately creative approach. "
    } else {
        "Conventional concept with limited originality. "
    });
    out.push_str(if complexity >= 80.0 {
        "Complex composition with multiple elements. "
    } else if complexity >= 60.0 {
        "Moderate complexity in design. "
    } else {
        "Simple, straightforward composition. "
    });
    out.push_str(if artistic >= 80.0 {
        "Strong artistic direction with attention to visual elements. "
    } else if artistic >= 60.0 {
        "Some artistic considerations present. "
    } else {
        "Limited artistic refinement. "
    });
    let _ = write!(out, "Generated using {model_id}, ");
    out.push_str(if model >= 85.0 {
        "which is well-suited for this type of creative work."
    } else if model >= 70.0 {
        "which provides adequate creative capabilities."
    } else {
        "which may have limitations for complex creative tasks."
    });
    out
}

pub(super) fn assess(request: &EvaluationRequest) -> Assessment {
    let prompt = request.prompt.to_lowercase();
    let width = request.metadata.as_ref().and_then(|m| m.width);

    let originality_score = originality(&prompt);
    let complexity_score = complexity(&prompt, width);
    let artistic_score = artistic_elements(&prompt);
    let model_score = model_capability(&request.model_id, &prompt);

    let score = weighted_score(&[
        (0.30, originality_score),
        (0.25, complexity_score),
        (0.25, artistic_score),
        (0.20, model_score),
    ]);

    Assessment {
        score,
        reasoning: reasoning(
            originality_score,
            complexity_score,
            artistic_score,
            model_score,
            &request.model_id,
        ),
        details: json!({
            "originalityScore": originality_score,
            "complexityScore": complexity_score,
            "artisticScore": artistic_score,
            "modelScore": model_score,
            "llmModel": request.model_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::request_with;
    use crate::evaluation::Channel;

    #[test]
    fn originality_rewards_creative_words_and_mixed_themes() {
        // unique + surreal, robot (tech) + forest (nature).
        let score = originality("a unique surreal robot wandering a forest");
        assert!((score - (60.0 + 16.0 + 15.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn cliches_cost_points() {
        let score = originality("a generic stock photo of a plain desk");
        assert!((score - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn complexity_counts_elements_and_specs() {
        // 6 words, person + dog + tree, "4k" both a spec and a resolution keyword.
        let score = complexity("person walking dog under tree 4k", Some(3000));
        assert!((score - (50.0 + 15.0 + 10.0 + 5.0 + 5.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn very_short_prompt_loses_complexity() {
        assert!((complexity("logo", None) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn artistic_terms_accumulate() {
        // composition (+10), golden hour (+8), vibrant (+8).
        let score = artistic_elements("vibrant composition at golden hour");
        assert!((score - 76.0).abs() < f64::EPSILON, "score was {score}");
    }

    #[test]
    fn model_capability_table_is_first_match() {
        assert!((model_capability("Midjourney-v6", "a b c d e f g h i j") - 95.0).abs() < f64::EPSILON);
        assert!((model_capability("stable-diffusion-xl", "short") - 80.0).abs() < f64::EPSILON);
        assert!((model_capability("unknown-gen", "short") - 65.0).abs() < f64::EPSILON);
        let long = "word ".repeat(30);
        assert!((model_capability("dall-e-3", &long) - 93.0).abs() < f64::EPSILON);
    }

    #[test]
    fn assessment_is_deterministic() {
        let request = request_with(
            Channel::Instagram,
            "An imaginative retro robot tending a futuristic flower garden, cinematic lighting",
        );
        let first = assess(&request);
        let second = assess(&request);
        assert!((first.score - second.score).abs() < f64::EPSILON);
        assert_eq!(first.reasoning, second.reasoning);
        assert!(first.reasoning.contains("Generated using"));
    }
}
