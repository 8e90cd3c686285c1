use std::time::Instant;

use tracing::{debug, info, warn, Level};

use crate::metrics::metrics_recorder;
use crate::rerank::rerank_with_options;
use crate::store::CandidateSource;
use crate::types::{Candidate, InspirationQuery, MatchConfig, MatchError, ScoredMatch};


/// Inspiration matcher: scores candidates against a query and re-ranks them.
///
/// Holds only its validated configuration; every call is independent and
/// the matcher can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Construct a matcher, validating the configuration once.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score every candidate against the query tags, preserving input order.
    pub fn score_candidates<Q: AsRef<str>>(
        &self,
        query_tags: &[Q],
        candidates: Vec<Candidate>,
    ) -> Vec<ScoredMatch> {
        candidates
            .into_iter()
            .map(|candidate| {
                ScoredMatch::score(
                    candidate,
                    query_tags,
                    &self.config.scoring,
                    self.config.explain,
                )
            })
            .collect()
    }

    /// Location filter, scoring, cutoff, ranking, diversity and truncation
    /// over an already-retrieved candidate set.
    ///
    /// An empty candidate set yields an empty result.
    pub fn match_candidates(
        &self,
        query: &InspirationQuery,
        candidates: Vec<Candidate>,
    ) -> Vec<ScoredMatch> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "matcher.match_candidates",
            query_tags = query.tags.len(),
            diversity_boost = self.config.diversity_boost
        );
        let _guard = span.enter();

        let received = candidates.len();
        let candidates = match query.effective_location_filter() {
            Some(filter) => filter_by_location(candidates, filter),
            None => candidates,
        };
        if candidates.len() != received {
            debug!(
                received,
                kept = candidates.len(),
                "location_filter_applied"
            );
        }

        let candidate_count = candidates.len();
        let scored = self.score_candidates(&query.tags, candidates);
        let hits = rerank_with_options(scored, &self.config.rerank_options());

        let latency = start.elapsed();
        info!(
            candidate_count,
            hit_count = hits.len(),
            elapsed_micros = latency.as_micros(),
            "match_complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(
                latency,
                candidate_count,
                hits.len(),
                self.config.diversity_boost,
            );
        }
        hits
    }

    /// Validate the query, fetch neighbours from `source`, then
    /// [`match_candidates`](Self::match_candidates).
    pub fn search(
        &self,
        source: &dyn CandidateSource,
        query: &InspirationQuery,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let span = tracing::span!(Level::INFO, "matcher.search", top_k = self.config.top_k());
        let _guard = span.enter();

        if let Err(err) = query.validate(self.config.expected_dimensions) {
            warn!(error = %err, "invalid_query");
            return Err(err);
        }

        let candidates = match source.nearest(&query.embedding, self.config.top_k()) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "candidate_source_failure");
                return Err(err);
            }
        };

        Ok(self.match_candidates(query, candidates))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }
}

/// Keep candidates whose display location contains `filter`
/// (case-insensitive). Candidates without a location are dropped.
fn filter_by_location(candidates: Vec<Candidate>, filter: &str) -> Vec<Candidate> {
    let needle = filter.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| {
            c.display
                .location
                .as_deref()
                .is_some_and(|loc| loc.to_lowercase().contains(&needle))
        })
        .collect()
}
