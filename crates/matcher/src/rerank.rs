//! Score cutoff, ordering, and near-duplicate suppression.
//!
//! Ranking is a stable sort on `final_score` descending, so two matches with
//! the same score keep the order the candidate source returned them in and
//! repeated runs over identical input produce identical output.
//!
//! The diversity pass only kicks in for result sets of at least
//! [`DIVERSITY_MIN_CANDIDATES`]. It walks the ranked list and admits a match
//! when its cosine distance differs by more than [`DIVERSITY_DISTANCE_GAP`]
//! from every match admitted so far. The first
//! [`DIVERSITY_GUARANTEED_ADMITS`] matches are admitted unconditionally, so a
//! cluster of near-identical photos still yields a usable result page.

use serde::{Deserialize, Serialize};

use crate::types::ScoredMatch;

/// Default score cutoff.
pub const DEFAULT_MIN_SCORE: u8 = 40;

/// Smallest ranked set the diversity pass is applied to.
pub const DIVERSITY_MIN_CANDIDATES: usize = 6;

/// Matches admitted regardless of distance spacing.
pub const DIVERSITY_GUARANTEED_ADMITS: usize = 3;

/// Minimum distance spacing between admitted matches.
pub const DIVERSITY_DISTANCE_GAP: f64 = 0.05;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RerankOptions {
    pub min_score: u8,
    pub diversity_boost: bool,
    /// Truncate after ranking and diversification.
    pub max_results: Option<usize>,
}

impl Default for RerankOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            diversity_boost: false,
            max_results: None,
        }
    }
}

/// Filter by `min_score`, sort by `final_score` descending, and optionally
/// suppress near-duplicates.
pub fn rerank(matches: Vec<ScoredMatch>, min_score: u8, diversity_boost: bool) -> Vec<ScoredMatch> {
    rerank_with_options(
        matches,
        &RerankOptions {
            min_score,
            diversity_boost,
            max_results: None,
        },
    )
}

/// [`rerank`] plus an optional result cap.
pub fn rerank_with_options(matches: Vec<ScoredMatch>, opts: &RerankOptions) -> Vec<ScoredMatch> {
    let mut ranked: Vec<ScoredMatch> = matches
        .into_iter()
        .filter(|m| m.final_score >= opts.min_score)
        .collect();

    // Vec::sort_by is stable.
    ranked.sort_by(|a, b| b.final_score.cmp(&a.final_score));

    if opts.diversity_boost && ranked.len() >= DIVERSITY_MIN_CANDIDATES {
        ranked = diversify(ranked);
    }

    if let Some(limit) = opts.max_results {
        ranked.truncate(limit);
    }
    ranked
}

fn diversify(ranked: Vec<ScoredMatch>) -> Vec<ScoredMatch> {
    let mut admitted: Vec<ScoredMatch> = Vec::with_capacity(ranked.len());
    for candidate in ranked {
        let spaced = admitted
            .iter()
            .all(|a| (a.distance() - candidate.distance()).abs() > DIVERSITY_DISTANCE_GAP);
        if admitted.len() < DIVERSITY_GUARANTEED_ADMITS || spaced {
            admitted.push(candidate);
        }
    }
    admitted
}
