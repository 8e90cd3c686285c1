//! Hybrid blend of vector similarity and tag overlap.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::tags::matching_tags;
use crate::transform::score_from_distance;
use crate::{clamp_score, round_score};

/// Unrounded inputs behind a [`HybridScore`], kept for audits and the
/// "why this matched" panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub distance: f64,
    pub similarity: f64,
    pub raw_vector_score: f64,
    pub raw_tag_score: f64,
    pub raw_final_score: f64,
    pub vector_weight: f64,
    pub tag_weight: f64,
    pub matched_tag_count: usize,
    pub query_tag_count: usize,
    /// Display only. Category never moves the score.
    pub category: String,
}

/// Result of scoring one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HybridScore {
    pub vector_score: u8,
    pub tag_score: u8,
    pub final_score: u8,
    pub matching_tags: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Score one candidate against the query.
///
/// With no query tags the tag score is 0 and the final score is the vector
/// score alone. Weights are taken from `cfg` as-is; callers are expected to
/// have run [`ScoringConfig::validate`] once at startup.
pub fn calculate_hybrid_score<Q, C>(
    distance: f64,
    query_tags: &[Q],
    candidate_tags: &[C],
    category: &str,
    cfg: &ScoringConfig,
) -> HybridScore
where
    Q: AsRef<str>,
    C: AsRef<str>,
{
    let vector = score_from_distance(distance);
    let matched = matching_tags(query_tags, candidate_tags);

    let (tag, blended) = if query_tags.is_empty() {
        (0.0, vector)
    } else {
        let tag = clamp_score(matched.len() as f64 / query_tags.len().max(1) as f64 * 100.0);
        (tag, cfg.vector_weight * vector + cfg.tag_weight * tag)
    };
    let blended = clamp_score(blended);

    HybridScore {
        vector_score: round_score(vector),
        tag_score: round_score(tag),
        final_score: round_score(blended),
        breakdown: ScoreBreakdown {
            distance,
            similarity: 1.0 - distance,
            raw_vector_score: vector,
            raw_tag_score: tag,
            raw_final_score: blended,
            vector_weight: cfg.vector_weight,
            tag_weight: cfg.tag_weight,
            matched_tag_count: matched.len(),
            query_tag_count: query_tags.len(),
            category: category.to_string(),
        },
        matching_tags: matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_query_tags_fall_back_to_vector_score() {
        let none: Vec<String> = Vec::new();
        let score = calculate_hybrid_score(
            0.15,
            &none,
            &tags(&["bridal"]),
            "hair",
            &ScoringConfig::default(),
        );
        assert_eq!(score.tag_score, 0);
        assert_eq!(score.final_score, score.vector_score);
        assert!(score.matching_tags.is_empty());
        assert_eq!(score.breakdown.query_tag_count, 0);
    }

    #[test]
    fn full_tag_overlap_lifts_final_score() {
        let cfg = ScoringConfig::default();
        let query = tags(&["bridal", "updo"]);
        let with_tags =
            calculate_hybrid_score(0.25, &query, &tags(&["Updo", "BRIDAL"]), "hair", &cfg);
        let without = calculate_hybrid_score(0.25, &query, &tags(&["casual"]), "hair", &cfg);

        assert_eq!(with_tags.tag_score, 100);
        assert_eq!(without.tag_score, 0);
        assert!(with_tags.final_score > without.final_score);
        assert_eq!(with_tags.vector_score, without.vector_score);
    }

    #[test]
    fn partial_overlap_is_fractional() {
        let score = calculate_hybrid_score(
            0.1,
            &tags(&["bridal", "updo", "pearls", "veil"]),
            &tags(&["updo"]),
            "hair",
            &ScoringConfig::default(),
        );
        assert_eq!(score.tag_score, 25);
        assert_eq!(score.breakdown.matched_tag_count, 1);
    }

    #[test]
    fn blend_is_monotonic_in_both_inputs() {
        let cfg = ScoringConfig::default();
        let query = tags(&["a", "b", "c"]);
        let candidate_sets = [tags(&[]), tags(&["a"]), tags(&["a", "b"]), tags(&["a", "b", "c"])];

        for step in 0..40 {
            let distance = step as f64 * 0.025;
            let mut previous_final = 0u8;
            for candidate in &candidate_sets {
                let near = calculate_hybrid_score(distance, &query, candidate, "", &cfg);
                let far = calculate_hybrid_score(distance + 0.025, &query, candidate, "", &cfg);
                assert!(near.final_score >= previous_final);
                assert!(near.final_score >= far.final_score);
                previous_final = near.final_score;
            }
        }
    }

    #[test]
    fn category_does_not_move_the_score() {
        let cfg = ScoringConfig::default();
        let query = tags(&["nails"]);
        let candidate = tags(&["nails"]);
        let hair = calculate_hybrid_score(0.3, &query, &candidate, "hair", &cfg);
        let nails = calculate_hybrid_score(0.3, &query, &candidate, "nails", &cfg);
        assert_eq!(hair.final_score, nails.final_score);
        assert_eq!(nails.breakdown.category, "nails");
    }

    #[test]
    fn malformed_distance_is_clamped() {
        let cfg = ScoringConfig::default();
        let query = tags(&["x"]);
        let score = calculate_hybrid_score(-3.0, &query, &query, "", &cfg);
        assert_eq!(score.final_score, 100);
        assert_eq!(score.breakdown.distance, -3.0);

        let score = calculate_hybrid_score(f64::NAN, &query, &tags(&[]), "", &cfg);
        assert_eq!(score.final_score, 0);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let score = calculate_hybrid_score(
            0.02,
            &tags(&["bridal"]),
            &tags(&["bridal"]),
            "hair",
            &ScoringConfig::default(),
        );
        let json = serde_json::to_value(&score).unwrap();
        assert!(json.get("finalScore").is_some());
        assert!(json.get("matchingTags").is_some());
        assert!(json["breakdown"].get("rawVectorScore").is_some());
    }
}
