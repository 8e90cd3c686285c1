//! Perceptual score curve.
//!
//! Raw cosine similarity is a poor "how alike do these look" number: two
//! unrelated salon photos routinely sit around 0.5, while near-duplicates
//! cluster above 0.95. The curve below stretches the top bands and squeezes
//! everything under 0.6 towards zero.
//!
//! | similarity    | score                          |
//! |---------------|--------------------------------|
//! | `>= 0.98`     | `95 + (s - 0.98) * 250`        |
//! | `[0.90,0.98)` | `85 + (s - 0.90) * 125`        |
//! | `[0.80,0.90)` | `70 + (s - 0.80) * 150`        |
//! | `[0.70,0.80)` | `55 + (s - 0.70) * 150`        |
//! | `[0.60,0.70)` | `40 + (s - 0.60) * 150`        |
//! | `< 0.60`      | `max(0, s * 66.7)`             |
//!
//! The lowest band tops out at 40.02 just under 0.6, so the raw curve dips
//! by 0.02 at that seam. Rounded scores are unaffected.

use crate::clamp_score;

/// Convert a cosine distance (`0` = identical direction, `2` = opposite) into
/// a 0-100 score.
///
/// Out-of-range distances are not rejected; they flow through the curve and
/// the result is clamped.
pub fn score_from_distance(distance: f64) -> f64 {
    score_from_similarity(1.0 - distance)
}

/// Apply the piecewise curve to a cosine similarity.
pub fn score_from_similarity(similarity: f64) -> f64 {
    let s = similarity;
    let raw = if s >= 0.98 {
        95.0 + (s - 0.98) * 250.0
    } else if s >= 0.90 {
        85.0 + (s - 0.90) * 125.0
    } else if s >= 0.80 {
        70.0 + (s - 0.80) * 150.0
    } else if s >= 0.70 {
        55.0 + (s - 0.70) * 150.0
    } else if s >= 0.60 {
        40.0 + (s - 0.60) * 150.0
    } else {
        (s * 66.7).max(0.0)
    };
    clamp_score(raw)
}
