//! Shared fixtures for the inspiration matching benchmarks.

#![allow(dead_code)]

use inspo::{Candidate, DisplayMetadata, InMemoryMediaStore, IndexedMedia, InspirationQuery};

pub const BENCH_DIMS: usize = 64;

const TAG_POOL: &[&str] = &[
    "bridal", "updo", "braids", "balayage", "bob", "curls", "glam", "natural", "nails", "french",
    "chrome", "lashes", "brows", "locs", "pixie", "waves",
];

/// Deterministic pseudo-random embedding (xorshift), not normalized.
pub fn embedding(seed: u64, dims: usize) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..dims)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 2000) as f32 / 1000.0 - 1.0
        })
        .collect()
}

pub fn tags_for(seed: usize, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| TAG_POOL[(seed * 7 + i * 3) % TAG_POOL.len()].to_string())
        .collect()
}

/// Candidates with distances spread over `[0, 1)`.
pub fn sample_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| {
            Candidate::new(format!("media-{i}"), (i % 100) as f64 / 100.0)
                .with_tags(tags_for(i, 4))
                .with_category(if i % 2 == 0 { "hair" } else { "nails" })
        })
        .collect()
}

pub fn populated_store(count: usize) -> InMemoryMediaStore {
    let store = InMemoryMediaStore::new(BENCH_DIMS);
    for i in 0..count {
        store
            .upsert(IndexedMedia {
                media_id: format!("media-{i}"),
                embedding: embedding(i as u64 + 1, BENCH_DIMS),
                tags: tags_for(i, 4),
                category: "hair".to_string(),
                display: DisplayMetadata::default(),
            })
            .expect("bench media is valid");
    }
    store
}

pub fn sample_query() -> InspirationQuery {
    InspirationQuery::new(embedding(42, BENCH_DIMS), ["bridal", "updo", "glam"])
}
