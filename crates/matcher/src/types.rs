use scoring::{calculate_hybrid_score, ScoreBreakdown, ScoringConfig, ScoringError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rerank::{RerankOptions, DEFAULT_MIN_SCORE};

/// Embedding width produced by the multimodal embedding model.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1408;

/// Presentation fields carried alongside a candidate.
///
/// None of these participate in scoring; they are copied into the
/// [`ScoredMatch`] unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetadata {
    #[serde(default, alias = "service_id", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, alias = "service_name", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, alias = "provider_id", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, alias = "provider_name", skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Accepts a number or a numeric string (SQL decimals often arrive as text).
    #[serde(
        default,
        deserialize_with = "deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, alias = "media_url", skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, alias = "thumbnail_url", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Free-form provider location (city, neighbourhood). Used by the
    /// optional location filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Number(price)) => Ok(Some(price)),
        Some(RawPrice::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("price {text:?} is not a number"))),
    }
}

/// One indexed service-media item returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub media_id: String,
    /// Cosine distance to the query embedding, `0` = identical direction.
    pub distance: f64,
    pub tags: Vec<String>,
    pub category: String,
    #[serde(flatten)]
    pub display: DisplayMetadata,
}

impl Candidate {
    pub fn new(media_id: impl Into<String>, distance: f64) -> Self {
        Self {
            media_id: media_id.into(),
            distance,
            tags: Vec::new(),
            category: String::new(),
            display: DisplayMetadata::default(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_display(mut self, display: DisplayMetadata) -> Self {
        self.display = display;
        self
    }
}

/// A candidate plus the scores derived for the current query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub vector_score: u8,
    pub tag_score: u8,
    /// Blended score used for ranking, always within `0..=100`.
    pub final_score: u8,
    /// Query tags (original spelling) that the candidate also carries.
    pub matching_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoredMatch {
    /// Score a candidate against the query tags.
    pub fn score<Q: AsRef<str>>(
        candidate: Candidate,
        query_tags: &[Q],
        cfg: &ScoringConfig,
        explain: bool,
    ) -> Self {
        let score = calculate_hybrid_score(
            candidate.distance,
            query_tags,
            &candidate.tags,
            &candidate.category,
            cfg,
        );
        Self {
            candidate,
            vector_score: score.vector_score,
            tag_score: score.tag_score,
            final_score: score.final_score,
            matching_tags: score.matching_tags,
            breakdown: explain.then_some(score.breakdown),
        }
    }

    pub fn media_id(&self) -> &str {
        &self.candidate.media_id
    }

    pub fn distance(&self) -> f64 {
        self.candidate.distance
    }
}

/// Per-request inspiration query. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspirationQuery {
    /// L2-normalized embedding of the uploaded photo.
    pub embedding: Vec<f32>,
    /// Tags extracted from the photo by the vision model.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location_filter: Option<String>,
}

impl InspirationQuery {
    pub fn new<I, S>(embedding: Vec<f32>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            embedding,
            tags: tags.into_iter().map(Into::into).collect(),
            location_filter: None,
        }
    }

    pub fn with_location_filter(mut self, location: impl Into<String>) -> Self {
        self.location_filter = Some(location.into());
        self
    }

    /// The location filter, if one is set and not blank.
    pub fn effective_location_filter(&self) -> Option<&str> {
        self.location_filter
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Check the embedding before it is sent to a candidate source.
    pub fn validate(&self, expected_dimensions: Option<usize>) -> Result<(), MatchError> {
        if self.embedding.is_empty() {
            return Err(MatchError::InvalidQuery("embedding must not be empty".into()));
        }
        if let Some(expected) = expected_dimensions {
            if self.embedding.len() != expected {
                return Err(MatchError::DimensionMismatch {
                    expected,
                    actual: self.embedding.len(),
                });
            }
        }
        if let Some(pos) = self.embedding.iter().position(|v| !v.is_finite()) {
            return Err(MatchError::InvalidQuery(format!(
                "embedding component {pos} is not finite"
            )));
        }
        Ok(())
    }
}

/// Configuration for the matching engine.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: String,
    /// Blend weights for vector and tag signals.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Matches scoring below this are dropped before ranking.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: u8,
    /// Suppress near-duplicate results after ranking.
    #[serde(default)]
    pub diversity_boost: bool,
    /// Maximum number of results returned to the caller.
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
    /// Oversampling factor when asking a candidate source for neighbours.
    /// Internal `top_k` is `ceil(max_results * oversample_factor)`.
    #[serde(default = "MatchConfig::default_oversample_factor")]
    pub oversample_factor: f32,
    /// Required embedding width, if pinned.
    #[serde(default = "MatchConfig::default_expected_dimensions")]
    pub expected_dimensions: Option<usize>,
    /// Attach unrounded score breakdowns to each match.
    #[serde(default)]
    pub explain: bool,
}

impl MatchConfig {
    pub(crate) fn default_version() -> String {
        "v1".to_string()
    }

    pub(crate) fn default_min_score() -> u8 {
        DEFAULT_MIN_SCORE
    }

    pub(crate) fn default_max_results() -> usize {
        20
    }

    pub(crate) fn default_oversample_factor() -> f32 {
        2.0
    }

    pub(crate) fn default_expected_dimensions() -> Option<usize> {
        Some(DEFAULT_EMBEDDING_DIMENSIONS)
    }

    /// Re-ranking options derived from this config.
    pub fn rerank_options(&self) -> RerankOptions {
        RerankOptions {
            min_score: self.min_score,
            diversity_boost: self.diversity_boost,
            max_results: Some(self.max_results),
        }
    }

    /// Number of neighbours to request from a candidate source.
    pub fn top_k(&self) -> usize {
        ((self.max_results as f32) * self.oversample_factor).ceil() as usize
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "config.version must not be empty".into(),
            ));
        }
        if self.min_score > 100 {
            return Err(MatchError::InvalidConfig(
                "min_score must be between 0 and 100".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        if !self.oversample_factor.is_finite() || self.oversample_factor < 1.0 {
            return Err(MatchError::InvalidConfig(
                "oversample_factor must be >= 1.0".into(),
            ));
        }
        if self.expected_dimensions == Some(0) {
            return Err(MatchError::InvalidConfig(
                "expected_dimensions must be greater than zero".into(),
            ));
        }
        self.scoring.validate()?;
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            scoring: ScoringConfig::default(),
            min_score: Self::default_min_score(),
            diversity_boost: false,
            max_results: Self::default_max_results(),
            oversample_factor: Self::default_oversample_factor(),
            expected_dimensions: Self::default_expected_dimensions(),
            explain: false,
        }
    }
}

/// Errors produced by the matching layer.
///
/// Scoring and re-ranking never fail; these cover configuration, query
/// validation, boundary parsing and candidate sources.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("invalid inspiration query: {0}")]
    InvalidQuery(String),
    #[error("invalid candidate: {0}")]
    InvalidCandidate(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// The candidate source (vector store) failed.
    #[error("candidate source error: {0}")]
    Source(String),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
