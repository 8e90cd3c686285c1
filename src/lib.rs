//! Workspace umbrella crate for inspiration matching.
//!
//! Stitches the pure scoring primitives (`scoring`) and the matching engine
//! (`matcher`) together so a request handler can go from raw
//! similarity-search rows to a ranked, JSON-ready result list with a single
//! call.

pub mod config;

pub use crate::config::{ConfigLoadError, InspoConfig};
pub use matcher::{
    Candidate, CandidateRow, CandidateSource, DisplayMetadata, InMemoryMediaStore, IndexedMedia,
    InspirationQuery, MatchConfig, MatchError, MatchMetrics, Matcher, RerankOptions, ScoredMatch,
    candidate_rows_from_json, candidates_from_rows, cosine_distance, l2_normalize,
    parse_candidates, rerank, rerank_with_options, set_match_metrics,
};
pub use scoring::{
    HybridScore, ScoreBreakdown, ScoringConfig, ScoringError, calculate_hybrid_score,
    matching_tags, normalize_tag, score_from_distance, score_from_similarity,
};

use tracing::{debug, warn};

/// Build a matcher from a loaded YAML configuration.
pub fn matcher_from_config(cfg: &InspoConfig) -> Result<Matcher, MatchError> {
    Matcher::new(cfg.to_match_config())
}

/// Rank already-deserialized similarity-search rows.
///
/// Rows that fail boundary validation are skipped and logged; they never
/// abort the request.
pub fn rank_rows<I>(matcher: &Matcher, query: &InspirationQuery, rows: I) -> Vec<ScoredMatch>
where
    I: IntoIterator<Item = CandidateRow>,
{
    let candidates = candidates_from_rows(rows);
    debug!(candidate_count = candidates.len(), "rows_parsed");
    matcher.match_candidates(query, candidates)
}

/// Rank a JSON array of similarity-search rows.
///
/// Each row is deserialized on its own, so a row with an off-type column is
/// skipped with a warning instead of failing the batch. A body that is not a
/// JSON array yields an empty result, matching the "no matches" presentation
/// callers show for any upstream failure.
pub fn rank_json_rows(matcher: &Matcher, query: &InspirationQuery, json: &str) -> Vec<ScoredMatch> {
    match candidate_rows_from_json(json) {
        Ok(rows) => rank_rows(matcher, query, rows),
        Err(err) => {
            warn!(error = %err, "candidate_rows_malformed");
            Vec::new()
        }
    }
}
