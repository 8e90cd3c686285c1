//! Boundary parsing of raw similarity-search rows.
//!
//! Rows coming back from a vector store are loosely shaped: distances may be
//! serialized as strings, tag arrays may be null or contain nulls, and column
//! names may be snake_case or camelCase. [`CandidateRow`] accepts all of
//! that, and `Candidate::try_from` turns it into the strict [`Candidate`]
//! the scorer consumes.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::{Candidate, DisplayMetadata, MatchError};

/// Distance column as it may appear on the wire.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawDistance {
    Number(f64),
    Text(String),
}

/// One loosely-typed row from a similarity search.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CandidateRow {
    #[serde(default, alias = "mediaId")]
    pub media_id: Option<String>,
    #[serde(default)]
    pub distance: Option<RawDistance>,
    #[serde(default)]
    pub tags: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub display: DisplayMetadata,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = MatchError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        let media_id = row
            .media_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| MatchError::InvalidCandidate("media_id is missing or blank".into()))?;

        let distance = match row.distance {
            Some(RawDistance::Number(d)) => d,
            Some(RawDistance::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
                MatchError::InvalidCandidate(format!(
                    "media {media_id}: distance {text:?} is not a number"
                ))
            })?,
            None => {
                return Err(MatchError::InvalidCandidate(format!(
                    "media {media_id}: distance is missing"
                )))
            }
        };
        if !distance.is_finite() {
            return Err(MatchError::InvalidCandidate(format!(
                "media {media_id}: distance is not finite"
            )));
        }

        let tags = row
            .tags
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .collect();

        Ok(Candidate {
            media_id,
            distance,
            tags,
            category: row.category.unwrap_or_default(),
            display: row.display,
        })
    }
}

/// Split a JSON body into per-row values; only the outer array shape is
/// checked here.
fn row_values(json: &str) -> Result<Vec<Value>, MatchError> {
    serde_json::from_str(json)
        .map_err(|e| MatchError::InvalidCandidate(format!("malformed candidate rows: {e}")))
}

/// Parse a JSON array of rows, failing on the first malformed row.
pub fn parse_candidates(json: &str) -> Result<Vec<Candidate>, MatchError> {
    row_values(json)?
        .into_iter()
        .enumerate()
        .map(|(row_index, value)| {
            let row = CandidateRow::deserialize(value).map_err(|e| {
                MatchError::InvalidCandidate(format!("row {row_index}: {e}"))
            })?;
            Candidate::try_from(row)
        })
        .collect()
}

/// Deserialize a JSON array of rows one row at a time.
///
/// Rows with off-type columns are logged and skipped; only a body that is
/// not a JSON array is an error.
pub fn candidate_rows_from_json(json: &str) -> Result<Vec<CandidateRow>, MatchError> {
    let rows = row_values(json)?
        .into_iter()
        .enumerate()
        .filter_map(|(row_index, value)| match CandidateRow::deserialize(value) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(row_index, error = %err, "candidate_row_malformed");
                None
            }
        })
        .collect();
    Ok(rows)
}

/// Convert rows, skipping (and logging) the ones that fail validation.
pub fn candidates_from_rows<I>(rows: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = CandidateRow>,
{
    rows.into_iter()
        .enumerate()
        .filter_map(|(row_index, row)| match Candidate::try_from(row) {
            Ok(candidate) => Some(candidate),
            Err(err) => {
                warn!(row_index, error = %err, "candidate_row_rejected");
                None
            }
        })
        .collect()
}
