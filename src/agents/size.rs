use super::Assessment;
use crate::evaluation::{Channel, EvaluationRequest};
use serde::Serialize;
use serde_json::json;

/// Expected asset size for a channel, with relative tolerance on absolute size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedSize {
    pub width: u32,
    pub height: u32,
    pub tolerance: f64,
}

impl ExpectedSize {
    pub fn for_channel(channel: &Channel) -> Self {
        let (width, height, tolerance) = match channel {
            Channel::Instagram => (1080, 1080, 0.10),
            Channel::TikTok => (1080, 1920, 0.10),
            Channel::LinkedIn => (1200, 627, 0.10),
            Channel::Facebook => (1200, 630, 0.10),
            Channel::Other(_) => (1200, 1200, 0.15),
        };
        Self {
            width,
            height,
            tolerance,
        }
    }
}

pub(super) fn assess(request: &EvaluationRequest) -> Assessment {
    let channel = &request.channel;
    let expected = ExpectedSize::for_channel(channel);

    let Some((width, height)) = request.dimensions() else {
        let meta = request.metadata.as_ref();
        return Assessment {
            score: 50.0,
            reasoning: "Unable to determine image dimensions. Metadata not available.".into(),
            details: json!({
                "expected": expected,
                "actual": {
                    "width": meta.and_then(|m| m.width).unwrap_or(0),
                    "height": meta.and_then(|m| m.height).unwrap_or(0),
                },
            }),
        };
    };

    let (w, h) = (f64::from(width), f64::from(height));
    let (ew, eh) = (f64::from(expected.width), f64::from(expected.height));

    let expected_ratio = ew / eh;
    let ratio_deviation = (expected_ratio - w / h).abs() / expected_ratio;
    let avg_deviation = ((w - ew).abs() / ew + (h - eh).abs() / eh) / 2.0;

    let (mut score, mut reasoning) = if ratio_deviation <= 0.05 {
        (100.0, format!("Perfect aspect ratio match for {channel}. "))
    } else if ratio_deviation <= 0.15 {
        (90.0, format!("Good aspect ratio for {channel}. "))
    } else if ratio_deviation <= 0.30 {
        (75.0, format!("Acceptable aspect ratio for {channel}. "))
    } else {
        (
            50.0,
            format!("Aspect ratio deviates significantly from {channel} standards. "),
        )
    };

    if avg_deviation <= expected.tolerance {
        reasoning.push_str("Dimensions are within acceptable range.");
    } else if avg_deviation <= 0.25 {
        score = f64::max(score - 10.0, 0.0);
        reasoning.push_str("Dimensions are slightly off from optimal size.");
    } else {
        score = f64::max(score - 20.0, 0.0);
        reasoning.push_str("Dimensions differ significantly from optimal size.");
    }

    if width >= expected.width && height >= expected.height {
        score = f64::min(score + 5.0, 100.0);
        reasoning.push_str(" High resolution detected.");
    }

    Assessment {
        score,
        reasoning: format!(
            "{reasoning} Actual: {width}x{height}, Expected: {}x{} for {channel}.",
            expected.width, expected.height
        ),
        details: json!({
            "expected": expected,
            "actual": { "width": width, "height": height },
            "ratioDeviation": format!("{ratio_deviation:.3}"),
            "avgDeviation": format!("{avg_deviation:.3}"),
        }),
    }
}
