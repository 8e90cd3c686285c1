//! YAML configuration file support.
//!
//! All matcher settings (blend weights, score cutoff, diversity, result cap,
//! embedding width) can be kept in one YAML file and loaded at startup.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "production"
//!
//! scoring:
//!   vector_weight: 0.7
//!   tag_weight: 0.3
//!
//! rerank:
//!   min_score: 40
//!   diversity_boost: true
//!   max_results: 20
//!   oversample_factor: 2.0
//!
//! query:
//!   expected_dimensions: 1408
//!
//! explain: false
//! ```

use std::fs;
use std::path::Path;

use matcher::{MatchConfig, MatchError, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_MIN_SCORE};
use scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InspoConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub rerank: RerankYamlConfig,

    #[serde(default)]
    pub query: QueryYamlConfig,

    /// Attach score breakdowns to every match
    #[serde(default)]
    pub explain: bool,
}

impl InspoConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: InspoConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.rerank.validate()?;
        self.query.validate()?;
        self.to_match_config().validate()?;
        Ok(())
    }

    /// Build the matcher configuration described by this file.
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            version: format!("v{}", self.version.trim_end_matches(".0")),
            scoring: self.scoring,
            min_score: self.rerank.min_score,
            diversity_boost: self.rerank.diversity_boost,
            max_results: self.rerank.max_results,
            oversample_factor: self.rerank.oversample_factor,
            expected_dimensions: self.query.expected_dimensions,
            explain: self.explain,
        }
    }
}

impl Default for InspoConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            scoring: ScoringConfig::default(),
            rerank: RerankYamlConfig::default(),
            query: QueryYamlConfig::default(),
            explain: false,
        }
    }
}

/// Re-ranking YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankYamlConfig {
    #[serde(default = "default_min_score")]
    pub min_score: u8,

    #[serde(default)]
    pub diversity_boost: bool,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_oversample")]
    pub oversample_factor: f32,
}

impl RerankYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.min_score > 100 {
            return Err(ConfigLoadError::Validation(
                "rerank.min_score must be <= 100".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(ConfigLoadError::Validation(
                "rerank.max_results must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RerankYamlConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            diversity_boost: false,
            max_results: default_max_results(),
            oversample_factor: default_oversample(),
        }
    }
}

/// Query YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryYamlConfig {
    /// Pin the embedding width; `null` accepts any width.
    #[serde(default = "default_dimensions")]
    pub expected_dimensions: Option<usize>,
}

impl QueryYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.expected_dimensions == Some(0) {
            return Err(ConfigLoadError::Validation(
                "query.expected_dimensions must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for QueryYamlConfig {
    fn default() -> Self {
        Self {
            expected_dimensions: default_dimensions(),
        }
    }
}

fn default_min_score() -> u8 {
    DEFAULT_MIN_SCORE
}

fn default_max_results() -> usize {
    20
}

fn default_oversample() -> f32 {
    2.0
}

fn default_dimensions() -> Option<usize> {
    Some(DEFAULT_EMBEDDING_DIMENSIONS)
}
