//! Tolerant parsing of the JSON contracts returned by the LLM-backed scorers.

use super::scoring::weighted_score;
use crate::error::AgentError;
use serde_json::Value;

/// Parse a model reply as a JSON object. Falls back to the outermost
/// `{ ... }` span when the reply wraps the object in prose or code fences.
pub fn parse_json_object(response: &str) -> Result<Value, AgentError> {
    let parsed = serde_json::from_str::<Value>(response.trim()).or_else(|first_err| {
        match (response.find('{'), response.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str::<Value>(&response[start..=end])
            }
            _ => Err(first_err),
        }
    });

    match parsed {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(AgentError::MalformedResponse(
            "expected a JSON object".into(),
        )),
        Err(e) => Err(AgentError::MalformedResponse(e.to_string())),
    }
}

/// Numeric field at a JSON pointer, clamped to 0..=100. Numeric strings are accepted.
pub fn required_score(value: &Value, pointer: &str) -> Result<f64, AgentError> {
    let field = value
        .pointer(pointer)
        .ok_or_else(|| AgentError::MissingField(pointer_to_path(pointer)))?;
    let number = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| AgentError::MissingField(pointer_to_path(pointer)))?;
    Ok(number.clamp(0.0, 100.0))
}

pub fn criterion_score(value: &Value, criterion: &str) -> Result<f64, AgentError> {
    required_score(value, &format!("/criteria/{criterion}/score"))
}

/// Locally recomputed weighted score over named sub-criteria.
pub fn weighted_criteria(value: &Value, weights: &[(&str, f64)]) -> Result<f64, AgentError> {
    let pairs = weights
        .iter()
        .map(|(name, weight)| criterion_score(value, name).map(|score| (*weight, score)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(weighted_score(&pairs))
}

pub fn optional_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn pointer_to_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let value = parse_json_object(r#"{"finalScore": 82}"#).unwrap();
        assert_eq!(value["finalScore"], 82);
    }

    #[test]
    fn extracts_object_from_fenced_reply() {
        let reply = "Here is the evaluation:\n```json\n{\"finalScore\": 74, \"reasoning\": \"ok\"}\n```";
        let value = parse_json_object(reply).unwrap();
        assert_eq!(value["finalScore"], 74);
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_json_object("I cannot evaluate this image.").unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(parse_json_object("[1, 2, 3]").is_err());
    }

    #[test]
    fn scores_are_clamped_and_strings_accepted() {
        let value = serde_json::json!({"a": 140, "b": "55", "c": -3});
        assert!((required_score(&value, "/a").unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((required_score(&value, "/b").unwrap() - 55.0).abs() < f64::EPSILON);
        assert!(required_score(&value, "/c").unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn missing_field_names_dotted_path() {
        let value = serde_json::json!({"criteria": {}});
        let err = criterion_score(&value, "visualIdentity").unwrap_err();
        assert_eq!(err.to_string(), "model response is missing required field `criteria.visualIdentity.score`");
    }

    #[test]
    fn weighted_criteria_recomputes_locally() {
        let value = serde_json::json!({
            "criteria": {
                "x": {"score": 90, "reasoning": "good"},
                "y": {"score": 50, "reasoning": "meh"}
            }
        });
        let score = weighted_criteria(&value, &[("x", 0.75), ("y", 0.25)]).unwrap();
        assert!((score - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn string_helpers() {
        let value = serde_json::json!({"r": "  ", "s": "fine", "list": ["a", 3, "b"]});
        assert_eq!(optional_string(&value, "r"), None);
        assert_eq!(optional_string(&value, "s").as_deref(), Some("fine"));
        assert_eq!(string_list(&value, "list"), vec!["a", "b"]);
        assert!(string_list(&value, "missing").is_empty());
    }
}
