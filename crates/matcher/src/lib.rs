//! # Inspiration Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the pure scoring primitives in `scoring`. Given
//! the embedding and tags of a client's inspiration photo, it asks a
//! [`CandidateSource`] (the vector store) for nearby service media, scores
//! each candidate with the hybrid vector + tag blend, drops weak matches,
//! ranks the rest and optionally suppresses near-duplicates.
//!
//! All I/O stays outside: the candidate source is a trait, storage and
//! presentation belong to the caller.
//!
//! ## Core Types
//!
//! - [`InspirationQuery`]: embedding, extracted tags, optional location filter.
//! - [`Candidate`]: one media item with its cosine distance, tags, category
//!   and pass-through [`DisplayMetadata`].
//! - [`ScoredMatch`]: candidate plus `vectorScore`, `tagScore`, `finalScore`
//!   and `matchingTags`.
//! - [`MatchConfig`]: weights, score cutoff, diversity switch, result cap.
//! - [`Matcher`]: wires the above together.
//! - [`CandidateRow`]: loose boundary shape of a raw similarity-search row.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{IndexedMedia, InMemoryMediaStore, InspirationQuery, MatchConfig, Matcher};
//!
//! let store = InMemoryMediaStore::new(3);
//! store
//!     .upsert(IndexedMedia {
//!         media_id: "media-1".into(),
//!         embedding: vec![1.0, 0.0, 0.0],
//!         tags: vec!["bridal".into(), "updo".into()],
//!         category: "hair".into(),
//!         display: Default::default(),
//!     })
//!     .expect("valid media");
//!
//! let matcher = Matcher::new(MatchConfig {
//!     expected_dimensions: Some(3),
//!     ..MatchConfig::default()
//! })
//! .expect("valid config");
//!
//! let query = InspirationQuery::new(vec![1.0, 0.0, 0.0], ["Bridal"]);
//! let hits = matcher.search(&store, &query).expect("search");
//!
//! assert_eq!(hits[0].media_id(), "media-1");
//! assert_eq!(hits[0].matching_tags, vec!["Bridal"]);
//! ```
//!
//! ## Observability
//!
//! Spans and events are emitted through `tracing`. Install a
//! [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-request latency and candidate/hit counts.

pub mod engine;
pub mod metrics;
pub mod parse;
pub mod rerank;
pub mod store;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::parse::{
    candidate_rows_from_json, candidates_from_rows, parse_candidates, CandidateRow, RawDistance,
};
pub use crate::rerank::{
    rerank, rerank_with_options, RerankOptions, DEFAULT_MIN_SCORE, DIVERSITY_DISTANCE_GAP,
    DIVERSITY_GUARANTEED_ADMITS, DIVERSITY_MIN_CANDIDATES,
};
pub use crate::store::{
    cosine_distance, l2_normalize, CandidateSource, InMemoryMediaStore, IndexedMedia,
};
pub use crate::types::{
    Candidate, DisplayMetadata, InspirationQuery, MatchConfig, MatchError, ScoredMatch,
    DEFAULT_EMBEDDING_DIMENSIONS,
};
pub use scoring::{ScoreBreakdown, ScoringConfig};
