//! # Inspiration Scoring
//!
//! Pure scoring primitives for visual inspiration matching. Given the cosine
//! distance between an inspiration photo embedding and an indexed service
//! media embedding, plus the tags attached to both, this crate produces the
//! percentage a client sees next to each suggested look.
//!
//! ## Contract
//!
//! - Every function is a pure function of its arguments: no I/O, no clocks,
//!   no global state.
//! - Scoring never fails. Degenerate inputs (empty tag lists, distances
//!   outside `[0, 2]`, NaN) are absorbed and the output is clamped to
//!   `[0, 100]`.
//! - Only [`ScoringConfig::validate`] returns an error, and only for weight
//!   settings that would break the blend's guarantees.
//!
//! ## Pipeline
//!
//! 1.  **Score transform** ([`score_from_distance`]): cosine distance is
//!     turned into a similarity and remapped through a piecewise curve that
//!     stretches the high-similarity bands and compresses weak matches
//!     towards zero.
//! 2.  **Tag matching** ([`matching_tags`]): case-insensitive set membership
//!     of query tags against candidate tags.
//! 3.  **Hybrid blend** ([`calculate_hybrid_score`]): weighted combination of
//!     the vector score and the tag-overlap score.
//!
//! ## Example Usage
//!
//! ```
//! use scoring::{calculate_hybrid_score, ScoringConfig};
//!
//! let query_tags = vec!["bridal".to_string(), "updo".to_string()];
//! let candidate_tags = vec!["Bridal".to_string(), "updo".to_string()];
//!
//! let score = calculate_hybrid_score(
//!     0.02,
//!     &query_tags,
//!     &candidate_tags,
//!     "hair",
//!     &ScoringConfig::default(),
//! );
//!
//! assert_eq!(score.tag_score, 100);
//! assert!(score.final_score >= 95);
//! assert_eq!(score.matching_tags, vec!["bridal", "updo"]);
//! ```

pub mod config;
pub mod hybrid;
pub mod tags;
pub mod transform;

pub use crate::config::{ScoringConfig, ScoringError};
pub use crate::hybrid::{calculate_hybrid_score, HybridScore, ScoreBreakdown};
pub use crate::tags::{matching_tags, normalize_tag};
pub use crate::transform::{score_from_distance, score_from_similarity};

/// Version of the scoring curve and blend. Bump on any change that can move
/// a returned score.
pub const SCORING_VERSION: u16 = 1;

/// Lowest score the scorer can return.
pub const MIN_SCORE: f64 = 0.0;

/// Highest score the scorer can return.
pub const MAX_SCORE: f64 = 100.0;

/// Clamp a raw score into `[MIN_SCORE, MAX_SCORE]`, mapping NaN to the floor.
pub(crate) fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Round a clamped score to the integer shown to clients.
pub(crate) fn round_score(raw: f64) -> u8 {
    clamp_score(raw).round() as u8
}
