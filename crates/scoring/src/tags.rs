//! Case-insensitive tag overlap.

use hashbrown::HashSet;

/// Normalized comparison form of a tag: surrounding whitespace trimmed and
/// lowercased.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Return the query tags that also appear among the candidate tags.
///
/// Comparison uses [`normalize_tag`] on both sides, but the returned strings
/// are the query tags exactly as given, in query order. A query tag repeated
/// in the input is repeated in the output.
pub fn matching_tags<Q, C>(query_tags: &[Q], candidate_tags: &[C]) -> Vec<String>
where
    Q: AsRef<str>,
    C: AsRef<str>,
{
    if query_tags.is_empty() || candidate_tags.is_empty() {
        return Vec::new();
    }

    let candidate_set: HashSet<String> = candidate_tags
        .iter()
        .map(|t| normalize_tag(t.as_ref()))
        .collect();

    let mut hits = Vec::new();
    for tag in query_tags {
        let tag: &str = tag.as_ref();
        if candidate_set.contains(&normalize_tag(tag)) {
            hits.push(tag.to_string());
        }
    }
    hits
}
