//! Candidate sources.
//!
//! Production deployments answer nearest-neighbour queries from an external
//! vector store (an IVFFlat/HNSW cosine index). The engine only needs the
//! [`CandidateSource`] seam; [`InMemoryMediaStore`] is a brute-force
//! implementation for tests, demos and small catalogues.

use std::sync::RwLock;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::{Candidate, DisplayMetadata, MatchError};

/// Anything that can return the `top_k` media items closest to an embedding.
///
/// Implementations return candidates ordered by ascending cosine distance.
pub trait CandidateSource: Send + Sync {
    fn nearest(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Candidate>, MatchError>;
}

/// A service-media item as stored at index time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexedMedia {
    pub media_id: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub display: DisplayMetadata,
}

/// Cosine distance `1 - cos(a, b)` computed in `f64`.
///
/// A zero-norm operand has no direction; it is treated as orthogonal
/// (distance `1.0`).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scale a vector to unit length. Zero vectors are returned unchanged.
pub fn l2_normalize(vector: &[f32]) -> Vec<f32> {
    let norm = vector
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|v| (f64::from(*v) / norm) as f32).collect()
}

#[derive(Default)]
struct StoreInner {
    entries: Vec<IndexedMedia>,
    positions: HashMap<String, usize>,
}

/// Brute-force in-memory media index.
///
/// Embeddings are L2-normalized on upsert. Among equal distances, results
/// come back in insertion order.
pub struct InMemoryMediaStore {
    dimensions: usize,
    inner: RwLock<StoreInner>,
}

impl InMemoryMediaStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert or replace a media item. Replacing keeps the original slot.
    pub fn upsert(&self, mut media: IndexedMedia) -> Result<(), MatchError> {
        if media.media_id.trim().is_empty() {
            return Err(MatchError::InvalidCandidate("media_id must not be empty".into()));
        }
        self.check_dimensions(&media.embedding)?;
        if media.embedding.iter().all(|v| *v == 0.0) {
            return Err(MatchError::InvalidCandidate(format!(
                "media {}: embedding has zero norm",
                media.media_id
            )));
        }
        if media.embedding.iter().any(|v| !v.is_finite()) {
            return Err(MatchError::InvalidCandidate(format!(
                "media {}: embedding is not finite",
                media.media_id
            )));
        }
        media.embedding = l2_normalize(&media.embedding);

        let mut inner = self.write();
        if let Some(&pos) = inner.positions.get(&media.media_id) {
            inner.entries[pos] = media;
        } else {
            let pos = inner.entries.len();
            inner.positions.insert(media.media_id.clone(), pos);
            inner.entries.push(media);
        }
        Ok(())
    }

    /// Remove a media item, returning it if it was present.
    pub fn remove(&self, media_id: &str) -> Option<IndexedMedia> {
        let mut inner = self.write();
        let pos = inner.positions.remove(media_id)?;
        let removed = inner.entries.remove(pos);
        for slot in inner.positions.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, media_id: &str) -> Option<IndexedMedia> {
        let inner = self.read();
        inner
            .positions
            .get(media_id)
            .map(|&pos| inner.entries[pos].clone())
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<(), MatchError> {
        if embedding.len() != self.dimensions {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CandidateSource for InMemoryMediaStore {
    fn nearest(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Candidate>, MatchError> {
        self.check_dimensions(embedding)?;
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let inner = self.read();
        let mut scored: Vec<(f64, &IndexedMedia)> = inner
            .entries
            .iter()
            .map(|media| (cosine_distance(embedding, &media.embedding), media))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(distance, media)| Candidate {
                media_id: media.media_id.clone(),
                distance,
                tags: media.tags.clone(),
                category: media.category.clone(),
                display: media.display.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str, embedding: Vec<f32>) -> IndexedMedia {
        IndexedMedia {
            media_id: id.to_string(),
            embedding,
            tags: vec!["bridal".into()],
            category: "hair".into(),
            display: DisplayMetadata::default(),
        }
    }

    #[test]
    fn cosine_distance_basics() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-12);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-12);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn l2_normalize_produces_unit_vectors() {
        let v = l2_normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn nearest_orders_by_distance() {
        let store = InMemoryMediaStore::new(2);
        store.upsert(media("orthogonal", vec![0.0, 1.0])).unwrap();
        store.upsert(media("same", vec![5.0, 0.0])).unwrap();
        store.upsert(media("diagonal", vec![1.0, 1.0])).unwrap();

        let hits = store.nearest(&[1.0, 0.0], 10).unwrap();
        let ids: Vec<_> = hits.iter().map(|c| c.media_id.as_str()).collect();
        assert_eq!(ids, vec!["same", "diagonal", "orthogonal"]);
        assert!(hits[0].distance.abs() < 1e-6);
        assert_eq!(hits[0].tags, vec!["bridal"]);
        assert_eq!(hits[0].category, "hair");
    }

    #[test]
    fn nearest_respects_top_k_and_ties_keep_insertion_order() {
        let store = InMemoryMediaStore::new(2);
        store.upsert(media("a", vec![1.0, 0.0])).unwrap();
        store.upsert(media("b", vec![2.0, 0.0])).unwrap();
        store.upsert(media("c", vec![0.0, 1.0])).unwrap();

        let hits = store.nearest(&[1.0, 0.0], 2).unwrap();
        let ids: Vec<_> = hits.iter().map(|c| c.media_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(store.nearest(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn upsert_replaces_in_place_and_remove_reindexes() {
        let store = InMemoryMediaStore::new(2);
        store.upsert(media("a", vec![1.0, 0.0])).unwrap();
        store.upsert(media("b", vec![0.0, 1.0])).unwrap();
        store.upsert(media("c", vec![1.0, 1.0])).unwrap();
        store.upsert(media("a", vec![0.0, 2.0])).unwrap();
        assert_eq!(store.len(), 3);
        let a = store.get("a").unwrap();
        assert!((a.embedding[1] - 1.0).abs() < 1e-6);

        assert!(store.remove("b").is_some());
        assert!(store.remove("b").is_none());
        assert_eq!(store.len(), 2);
        assert!(store.get("c").is_some());
        assert_eq!(store.get("c").unwrap().media_id, "c");
    }

    #[test]
    fn upsert_rejects_bad_embeddings() {
        let store = InMemoryMediaStore::new(3);
        assert!(matches!(
            store.upsert(media("short", vec![1.0, 0.0])),
            Err(MatchError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(store.upsert(media("zero", vec![0.0, 0.0, 0.0])).is_err());
        assert!(store.upsert(media("nan", vec![f32::NAN, 1.0, 0.0])).is_err());
        assert!(store.upsert(media(" ", vec![1.0, 0.0, 0.0])).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn nearest_rejects_dimension_mismatch() {
        let store = InMemoryMediaStore::new(3);
        assert!(store.nearest(&[1.0, 0.0], 5).is_err());
    }
}
