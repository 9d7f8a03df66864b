use super::Assessment;
use super::scoring::{as_f64, contains_any, weighted_score, word_count};
use crate::evaluation::EvaluationRequest;
use serde_json::json;
use std::fmt::Write as _;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "should", "could", "may", "might", "must", "can", "this",
    "that", "these", "those", "i", "you", "he", "she", "it", "we", "they",
];

const DETAIL_INDICATORS: &[&str] = &[
    "detailed", "realistic", "professional", "high-quality", "perfect", "beautiful", "stunning",
    "dramatic", "vibrant", "soft", "natural", "modern", "vintage", "minimalist", "elegant",
    "sophisticated", "composition", "lighting", "texture", "background", "foreground",
];

const COLOR_WORDS: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "grey", "gold", "silver", "bronze", "beige", "cream", "tan", "navy", "teal", "cyan",
    "magenta", "violet", "indigo", "maroon", "olive", "lime", "aqua", "turquoise", "coral",
    "salmon",
];

const STYLE_WORDS: &[&str] = &[
    "realistic", "abstract", "minimalist", "vintage", "modern", "retro", "contemporary",
    "classic", "artistic", "photographic", "illustrated", "painted", "drawn", "sketched",
    "rendered", "3d", "2d", "flat", "detailed", "simple", "complex", "clean", "rustic",
    "industrial", "organic", "geometric", "natural", "artificial", "dramatic", "subtle",
];

/// Semantic buckets for the coherence check.
const SUBJECT_CATEGORIES: &[(&str, &[&str])] = &[
    ("people", &["person", "man", "woman", "child", "people", "human", "face", "portrait"]),
    ("nature", &["tree", "forest", "mountain", "river", "ocean", "sky", "cloud", "flower"]),
    ("objects", &["car", "building", "house", "furniture", "tool", "device", "machine"]),
    ("animals", &["dog", "cat", "bird", "animal", "creature", "wildlife"]),
    ("abstract", &["concept", "idea", "emotion", "feeling", "mood", "atmosphere"]),
];

const MAX_KEYWORDS: usize = 20;

/// Meaningful words: longer than three characters and not a stopword.
pub fn extract_keywords(prompt_lower: &str) -> Vec<&str> {
    prompt_lower
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOPWORDS.contains(w))
        .take(MAX_KEYWORDS)
        .collect()
}

fn complexity_score(words: usize) -> f64 {
    match words {
        w if w > 20 => 90.0,
        w if w > 10 => 75.0,
        w if w > 5 => 60.0,
        _ => 50.0,
    }
}

fn specificity_score(details: bool, colors: bool, style: bool) -> f64 {
    match (details, colors, style) {
        (true, true, true) => 95.0,
        (true, true, false) | (true, false, true) => 80.0,
        (true, false, false) => 70.0,
        _ => 60.0,
    }
}

/// Base 50, +10 per brand colour token and +15 per brand style token found in the prompt.
pub fn brand_keyword_overlap(prompt_lower: &str, colors: &str, style: &str) -> f64 {
    let split = |s: &str| -> Vec<String> {
        s.to_lowercase()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    };
    let hits = |list: Vec<String>| list.iter().filter(|t| prompt_lower.contains(t.as_str())).count();

    let color_hits = hits(split(colors));
    let style_hits = hits(split(style));
    f64::min(50.0 + as_f64(color_hits) * 10.0 + as_f64(style_hits) * 15.0, 100.0)
}

/// Focused prompts (one or two subject categories) score higher than scattered ones.
pub fn coherence_score(keywords: &[&str]) -> f64 {
    let categories = SUBJECT_CATEGORIES
        .iter()
        .filter(|(_, words)| keywords.iter().any(|kw| words.iter().any(|w| kw.contains(w))))
        .count();
    match categories {
        1 => 95.0,
        2 => 85.0,
        3 => 70.0,
        _ => 60.0,
    }
}

pub(super) fn assess(request: &EvaluationRequest) -> Assessment {
    let prompt_lower = request.prompt.to_lowercase();
    let keywords = extract_keywords(&prompt_lower);
    let words = word_count(&request.prompt);

    let has_details = contains_any(&prompt_lower, DETAIL_INDICATORS);
    let has_colors = contains_any(&prompt_lower, COLOR_WORDS);
    let has_style = contains_any(&prompt_lower, STYLE_WORDS);

    let complexity = complexity_score(words);
    let specificity = specificity_score(has_details, has_colors, has_style);
    let brand_alignment =
        brand_keyword_overlap(&prompt_lower, &request.brand.colors, &request.brand.style);
    let coherence = coherence_score(&keywords);

    let score = weighted_score(&[
        (0.30, complexity),
        (0.25, specificity),
        (0.35, brand_alignment),
        (0.10, coherence),
    ]);

    let mut reasoning = format!(
        "Prompt analysis: {words} words, {} key elements identified. ",
        keywords.len()
    );
    reasoning.push_str(if brand_alignment >= 80.0 {
        "Strong brand alignment detected. "
    } else if brand_alignment >= 60.0 {
        "Moderate brand alignment. "
    } else {
        "Limited brand alignment. "
    });
    reasoning.push_str(if specificity >= 80.0 {
        "Highly specific and detailed prompt. "
    } else {
        "Moderately specific prompt. "
    });
    let _ = write!(
        reasoning,
        "Expected to match {}'s {} style.",
        request.brand.name,
        request.brand.style.to_lowercase()
    );

    Assessment {
        score,
        reasoning,
        details: json!({
            "wordCount": words,
            "keywords": keywords.iter().take(10).collect::<Vec<_>>(),
            "hasSpecificDetails": has_details,
            "hasColorMentions": has_colors,
            "hasStyleMentions": has_style,
            "brandAlignment": brand_alignment,
            "complexityScore": complexity,
            "specificityScore": specificity,
            "coherenceScore": coherence,
        }),
    }
}
