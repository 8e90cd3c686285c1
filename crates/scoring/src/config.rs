//! Configuration and error types for hybrid scoring.
//!
//! The scoring layer is free of I/O and environment-dependent behavior, so a
//! score is a pure function of `(distance, tags, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weighting policy for the hybrid blend.
///
/// The blend is `vector_weight * vector_score + tag_weight * tag_score`.
/// Vector similarity must dominate, and the weights must sum to one so the
/// blended value stays on the same 0-100 scale as its inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Weight of the perceptual vector score.
    #[serde(default = "ScoringConfig::default_vector_weight")]
    pub vector_weight: f64,
    /// Weight of the tag-overlap score.
    #[serde(default = "ScoringConfig::default_tag_weight")]
    pub tag_weight: f64,
}

impl ScoringConfig {
    pub(crate) fn default_vector_weight() -> f64 {
        0.7
    }

    pub(crate) fn default_tag_weight() -> f64 {
        0.3
    }

    /// Create a configuration with the default 0.7 / 0.3 split.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both weights at once.
    pub fn with_weights(mut self, vector_weight: f64, tag_weight: f64) -> Self {
        self.vector_weight = vector_weight;
        self.tag_weight = tag_weight;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let (v, t) = (self.vector_weight, self.tag_weight);
        if !v.is_finite() || !t.is_finite() {
            return Err(ScoringError::InvalidWeights {
                vector_weight: v,
                tag_weight: t,
                reason: "weights must be finite",
            });
        }
        if v < 0.0 || t < 0.0 {
            return Err(ScoringError::InvalidWeights {
                vector_weight: v,
                tag_weight: t,
                reason: "weights must be non-negative",
            });
        }
        if v < t {
            return Err(ScoringError::InvalidWeights {
                vector_weight: v,
                tag_weight: t,
                reason: "vector_weight must be >= tag_weight",
            });
        }
        if ((v + t) - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights {
                vector_weight: v,
                tag_weight: t,
                reason: "weights must sum to 1.0",
            });
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vector_weight: Self::default_vector_weight(),
            tag_weight: Self::default_tag_weight(),
        }
    }
}

/// Errors surfaced by the scoring configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("invalid scoring weights (vector={vector_weight}, tag={tag_weight}): {reason}")]
    InvalidWeights {
        vector_weight: f64,
        tag_weight: f64,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ScoringConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.vector_weight >= cfg.tag_weight);
    }

    #[test]
    fn tag_dominant_weights_rejected() {
        let cfg = ScoringConfig::new().with_weights(0.4, 0.6);
        let err = cfg.validate().expect_err("tag-dominant weights must be rejected");
        assert!(err.to_string().contains("vector_weight must be >= tag_weight"));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let cfg = ScoringConfig::new().with_weights(0.7, 0.2);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_and_non_finite_weights_rejected() {
        assert!(ScoringConfig::new().with_weights(1.2, -0.2).validate().is_err());
        assert!(ScoringConfig::new()
            .with_weights(f64::NAN, 0.3)
            .validate()
            .is_err());
    }

    #[test]
    fn pure_vector_weighting_is_valid() {
        assert!(ScoringConfig::new().with_weights(1.0, 0.0).validate().is_ok());
        assert!(ScoringConfig::new().with_weights(0.5, 0.5).validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ScoringConfig = serde_json::from_str(r#"{"vector_weight": 0.8}"#).unwrap();
        assert_eq!(cfg.vector_weight, 0.8);
        assert_eq!(cfg.tag_weight, 0.3);
    }
}
