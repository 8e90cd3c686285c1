use inspo::{
    Candidate, InMemoryMediaStore, InspirationQuery, MatchConfig, MatchError, Matcher,
    ScoringConfig, parse_candidates, rank_json_rows, rerank, score_from_distance,
};

#[test]
fn malformed_row_body_yields_no_matches() {
    let matcher = Matcher::default();
    let query = InspirationQuery::new(vec![1.0], ["bridal"]);
    assert!(rank_json_rows(&matcher, &query, "not json").is_empty());
    assert!(rank_json_rows(&matcher, &query, r#"{"media_id": "m1"}"#).is_empty());
    assert!(rank_json_rows(&matcher, &query, "[]").is_empty());
}

#[test]
fn invalid_rows_are_skipped_not_fatal() {
    let matcher = Matcher::default();
    let query = InspirationQuery::new(vec![1.0], ["bridal"]);
    let rows = r#"[
        {"media_id": "good", "distance": 0.01, "tags": ["bridal"]},
        {"media_id": "no-distance"},
        {"distance": 0.01},
        {"media_id": "bad-distance", "distance": "far"}
    ]"#;
    let hits = rank_json_rows(&matcher, &query, rows);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].media_id(), "good");

    assert!(matches!(
        parse_candidates(rows),
        Err(MatchError::InvalidCandidate(_))
    ));
}

#[test]
fn off_type_columns_skip_only_their_own_row() {
    let matcher = Matcher::default();
    let query = InspirationQuery::new(vec![1.0], ["bridal"]);
    let rows = r#"[
        {"media_id": "good", "distance": 0.01, "tags": ["bridal"]},
        {"media_id": "decimal-price", "distance": 0.02, "tags": ["bridal"], "price": "150.00"},
        {"media_id": 42, "distance": 0.01, "tags": ["bridal"]}
    ]"#;
    let hits = rank_json_rows(&matcher, &query, rows);
    let ids: Vec<_> = hits.iter().map(|h| h.media_id()).collect();
    assert_eq!(ids, vec!["good", "decimal-price"]);
    assert_eq!(hits[1].candidate.display.price, Some(150.0));
}

#[test]
fn degenerate_numeric_inputs_never_panic() {
    for distance in [-10.0, -1.0, 0.0, 2.0, 3.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let score = score_from_distance(distance);
        assert!((0.0..=100.0).contains(&score), "{distance} -> {score}");
    }

    let matcher = Matcher::default();
    let query = InspirationQuery::new(vec![1.0], Vec::<String>::new());
    let hits = matcher.match_candidates(
        &query,
        vec![Candidate::new("weird", -4.0), Candidate::new("nan", f64::NAN)],
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].final_score, 100);
}

#[test]
fn empty_inputs_are_valid() {
    assert!(rerank(Vec::new(), 40, true).is_empty());
    let matcher = Matcher::default();
    let query = InspirationQuery::new(vec![1.0], Vec::<String>::new());
    assert!(matcher.match_candidates(&query, Vec::new()).is_empty());
}

#[test]
fn invalid_configs_are_rejected() {
    let bad_weights = MatchConfig {
        scoring: ScoringConfig::new().with_weights(0.1, 0.9),
        ..MatchConfig::default()
    };
    assert!(matches!(Matcher::new(bad_weights), Err(MatchError::Scoring(_))));

    let bad_oversample = MatchConfig {
        oversample_factor: f32::NAN,
        ..MatchConfig::default()
    };
    assert!(matches!(
        Matcher::new(bad_oversample),
        Err(MatchError::InvalidConfig(_))
    ));
}

#[test]
fn query_dimension_mismatch_is_reported() {
    let matcher = Matcher::default();
    let store = InMemoryMediaStore::new(1408);
    let query = InspirationQuery::new(vec![0.1; 512], ["bridal"]);
    let err = matcher.search(&store, &query).expect_err("dimension mismatch");
    assert_eq!(
        err.to_string(),
        "embedding dimension mismatch: expected 1408, got 512"
    );
}
