//! Shared helpers for the keyword heuristics.

/// Weighted average of `(weight, score)` pairs, rounded. Zero total weight yields 0.
pub fn weighted_score(criteria: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = criteria.iter().map(|(w, _)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = criteria.iter().map(|(w, s)| w * s).sum();
    (weighted / total_weight).round()
}

pub fn clamp_unit(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of `needles` that occur anywhere in `haystack` (substring match).
pub fn count_matches(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack.contains(*n)).count()
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Split on commas, periods and whitespace, dropping empty pieces.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

#[allow(clippy::cast_precision_loss)]
pub fn as_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_score_rounds_half_up() {
        assert!((weighted_score(&[(0.5, 70.0), (0.5, 71.0)]) - 71.0).abs() < f64::EPSILON);
        assert!((weighted_score(&[(0.3, 90.0), (0.7, 50.0)]) - 62.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_score_normalizes_by_total_weight() {
        assert!((weighted_score(&[(2.0, 80.0), (2.0, 40.0)]) - 60.0).abs() < f64::EPSILON);
        assert!(weighted_score(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  a   red\tbike \n"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn substring_matching() {
        let text = "dramatic lighting on a golden hour beach";
        assert_eq!(count_matches(text, &["lighting", "light", "golden hour", "shadow"]), 3);
        assert!(contains_any(text, &["beach"]));
        assert!(!contains_any(text, &[]));
    }

    #[test]
    fn tokens_skip_empty_pieces() {
        let parts: Vec<_> = tokens("Bold, energetic.  Direct").collect();
        assert_eq!(parts, vec!["Bold", "energetic", "Direct"]);
    }
}
