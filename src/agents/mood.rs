use super::Assessment;
use super::scoring::{as_f64, clamp_unit, contains_any, count_matches, tokens, weighted_score};
use crate::evaluation::EvaluationRequest;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;

/// Emotional and atmospheric expectations for a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodProfile {
    pub emotions: &'static [&'static str],
    pub atmosphere: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

const KNOWN_PROFILES: &[(&str, MoodProfile)] = &[
    (
        "ChromaBloom Studios",
        MoodProfile {
            emotions: &["calm", "peaceful", "inspirational", "serene", "gentle"],
            atmosphere: &["organic", "natural", "earthy", "sophisticated", "refined"],
            keywords: &[
                "nature", "botanical", "green", "sustainable", "eco-friendly", "artistic",
                "creative", "vibrant", "colorful", "harmonious",
            ],
        },
    ),
    (
        "PulseForge Fitness",
        MoodProfile {
            emotions: &["energetic", "powerful", "motivated", "intense", "dynamic"],
            atmosphere: &["aggressive", "bold", "strong", "athletic", "competitive"],
            keywords: &[
                "fitness", "workout", "training", "strength", "power", "energy", "motion",
                "action", "performance", "athletic",
            ],
        },
    ),
    (
        "Æther & Crumb",
        MoodProfile {
            emotions: &["cozy", "comfortable", "nostalgic", "warm", "inviting"],
            atmosphere: &["sophisticated", "refined", "intimate", "rustic", "elegant"],
            keywords: &[
                "coffee", "bakery", "artisan", "handcrafted", "vintage", "gothic", "dark", "wood",
                "cozy", "intimate",
            ],
        },
    ),
];

const NEUTRAL_PROFILE: MoodProfile = MoodProfile {
    emotions: &["neutral", "balanced", "professional"],
    atmosphere: &["modern", "clean", "simple"],
    keywords: &["quality", "professional", "reliable"],
};

/// Exact brand-name lookup; unknown brands get the neutral profile.
pub fn profile_for(brand_name: &str) -> &'static MoodProfile {
    KNOWN_PROFILES
        .iter()
        .find(|(name, _)| *name == brand_name.trim())
        .map_or(&NEUTRAL_PROFILE, |(_, profile)| profile)
}

/// Mood buckets. The first four are emotions, the rest atmosphere.
const MOOD_BUCKETS: &[(&str, &[&str])] = &[
    ("calm", &["calm", "peaceful", "serene", "tranquil", "quiet", "gentle", "soft"]),
    ("energetic", &["energetic", "dynamic", "vibrant", "lively", "active", "powerful"]),
    ("cozy", &["cozy", "warm", "comfortable", "inviting", "intimate", "homey"]),
    ("dramatic", &["dramatic", "intense", "bold", "striking", "powerful", "strong"]),
    ("sophisticated", &["sophisticated", "elegant", "refined", "classy", "polished"]),
    ("playful", &["playful", "fun", "whimsical", "cheerful", "lighthearted"]),
    ("mysterious", &["mysterious", "dark", "moody", "enigmatic", "shadowy"]),
    ("nostalgic", &["vintage", "retro", "old", "nostalgic", "classic", "timeless"]),
    ("modern", &["modern", "contemporary", "sleek", "minimalist", "clean"]),
    ("natural", &["natural", "organic", "earthy", "rustic", "raw"]),
];

const EMOTION_BUCKETS: &[&str] = &["calm", "energetic", "cozy", "dramatic"];

const INTENSITY_MODIFIERS: &[&str] = &[
    "very", "extremely", "highly", "incredibly", "exceptionally", "dramatically", "intensely",
    "strongly", "deeply",
];

/// A detected prompt emotion conflicts with these brand emotions.
const CONFLICTS: &[(&str, &[&str])] = &[
    ("calm", &["energetic", "dramatic", "intense"]),
    ("energetic", &["calm", "peaceful", "serene"]),
    ("cozy", &["aggressive", "bold", "intense"]),
    ("dramatic", &["calm", "gentle", "soft"]),
];

const TONE_GROUPS: &[&[&str]] = &[
    &["professional", "expert", "quality", "premium"],
    &["casual", "friendly", "relaxed", "easy"],
    &["formal", "elegant", "sophisticated", "refined"],
    &["fun", "playful", "creative", "whimsical"],
    &["serious", "important", "significant", "critical"],
];

const SETTING_GROUPS: &[&[&str]] = &[
    &["indoor", "interior", "inside", "room", "studio"],
    &["outdoor", "exterior", "outside", "landscape", "nature"],
    &["city", "urban", "street", "building", "downtown"],
    &["nature", "forest", "mountain", "ocean", "wilderness"],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMood {
    pub emotions: Vec<&'static str>,
    pub atmosphere: Vec<&'static str>,
    pub intensity: u32,
}

pub fn analyze_prompt_mood(prompt: &str) -> PromptMood {
    let mut emotions = Vec::new();
    let mut atmosphere = Vec::new();
    let mut intensity = 50_u32;

    for (mood, keywords) in MOOD_BUCKETS {
        let hits = count_matches(prompt, keywords);
        if hits == 0 {
            continue;
        }
        if EMOTION_BUCKETS.contains(mood) {
            emotions.push(*mood);
        } else {
            atmosphere.push(*mood);
        }
        intensity += u32::try_from(hits).unwrap_or(u32::MAX / 10) * 5;
    }

    if contains_any(prompt, INTENSITY_MODIFIERS) {
        intensity += 15;
    }

    PromptMood {
        emotions,
        atmosphere,
        intensity: intensity.min(100),
    }
}

/// Base 60, +20 per shared emotion, -15 per conflicting pair. No detected emotion is neutral.
pub fn emotional_alignment(mood: &PromptMood, brand_emotions: &[&str]) -> f64 {
    if mood.emotions.is_empty() {
        return 60.0;
    }

    let matches = mood
        .emotions
        .iter()
        .filter(|e| brand_emotions.contains(e))
        .count();
    let conflicts: usize = mood
        .emotions
        .iter()
        .filter_map(|e| CONFLICTS.iter().find(|(k, _)| *k == *e).map(|(_, c)| *c))
        .map(|opposed| brand_emotions.iter().filter(|b| opposed.contains(b)).count())
        .sum();

    clamp_unit(60.0 + as_f64(matches) * 20.0 - as_f64(conflicts) * 15.0)
}

/// Mean of brand-voice word overlap and generic tone indicators.
pub fn voice_alignment(prompt: &str, brand_voice: &str) -> f64 {
    let voice = brand_voice.to_lowercase();
    let voice_hits = tokens(&voice)
        .filter(|w| w.chars().count() > 3)
        .filter(|w| prompt.contains(w))
        .count();
    let tone_hits = TONE_GROUPS
        .iter()
        .filter(|group| contains_any(prompt, group))
        .count();

    let base = 50.0 + as_f64(voice_hits) * 15.0;
    let tone = 50.0 + as_f64(tone_hits) * 10.0;
    f64::min(100.0, (base + tone) / 2.0)
}

pub fn atmosphere_alignment(prompt: &str, brand_atmosphere: &[&str]) -> f64 {
    let atmosphere_hits = count_matches(prompt, brand_atmosphere);
    let setting_hits = SETTING_GROUPS
        .iter()
        .filter(|group| contains_any(prompt, group))
        .count();
    clamp_unit(50.0 + as_f64(atmosphere_hits) * 15.0 + as_f64(setting_hits) * 5.0)
}

fn reasoning(
    brand_name: &str,
    mood: &PromptMood,
    profile: &MoodProfile,
    emotional: f64,
    voice: f64,
    atmosphere: f64,
) -> String {
    let mut out = format!("Mood analysis for {brand_name}: ");

    if emotional >= 80.0 {
        out.push_str("Strong emotional alignment detected. ");
        if !mood.emotions.is_empty() {
            let _ = write!(
                out,
                "Prompt conveys {} mood, matching brand expectations. ",
                mood.emotions.join(", ")
            );
        }
    } else if emotional >= 60.0 {
        out.push_str("Moderate emotional alignment. ");
    } else {
        out.push_str("Limited emotional alignment with brand. ");
        if !mood.emotions.is_empty() {
            let _ = write!(
                out,
                "Prompt mood ({}) may not fully align with {}. ",
                mood.emotions.join(", "),
                profile.emotions.join(", ")
            );
        }
    }

    out.push_str(if voice >= 80.0 {
        "Excellent brand voice consistency. "
    } else if voice >= 60.0 {
        "Acceptable brand voice alignment. "
    } else {
        "Brand voice could be stronger. "
    });

    out.push_str(if atmosphere >= 80.0 {
        "Atmosphere perfectly matches brand identity."
    } else if atmosphere >= 60.0 {
        "Atmosphere is generally consistent with brand."
    } else {
        "Atmosphere may need adjustment to better reflect brand."
    });
    out
}

pub(super) fn assess(request: &EvaluationRequest) -> Assessment {
    let prompt = request.prompt.to_lowercase();
    let profile = profile_for(&request.brand.name);
    let mood = analyze_prompt_mood(&prompt);

    let emotional = emotional_alignment(&mood, profile.emotions);
    let voice = voice_alignment(&prompt, &request.brand.voice);
    let atmosphere = atmosphere_alignment(&prompt, profile.atmosphere);

    let score = weighted_score(&[(0.40, emotional), (0.35, voice), (0.25, atmosphere)]);

    Assessment {
        score,
        reasoning: reasoning(&request.brand.name, &mood, profile, emotional, voice, atmosphere),
        details: json!({
            "promptMood": mood,
            "brandMoodProfile": profile,
            "emotionalScore": emotional,
            "voiceScore": voice,
            "atmosphereScore": atmosphere,
        }),
    }
}
