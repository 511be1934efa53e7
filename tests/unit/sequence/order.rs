use super::*;

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from(format!("frames/{n}"))).collect()
}

fn ordered_names(seq: &OrderedSequence) -> Vec<String> {
    seq.iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn extract_reads_token_between_separator_and_last_delimiter() {
    assert_eq!(OrderKey::extract("dir/42_cam.jpg", '_'), OrderKey::Valid(42));
    assert_eq!(OrderKey::extract("a/b/007_x_y.png", '_'), OrderKey::Invalid);
    assert_eq!(OrderKey::extract("a/b/7_x.png", '_'), OrderKey::Valid(7));
    assert_eq!(OrderKey::extract("15_noon.jpg", '_'), OrderKey::Valid(15));
    assert_eq!(OrderKey::extract("dir/-3_x.jpg", '_'), OrderKey::Valid(-3));
}

#[test]
fn extract_is_invalid_for_non_numeric_tokens() {
    assert_eq!(OrderKey::extract("dir/img_10_x.jpg", '_'), OrderKey::Invalid);
    assert_eq!(OrderKey::extract("dir/cover.jpg", '_'), OrderKey::Invalid);
    assert_eq!(OrderKey::extract("dir/_x.jpg", '_'), OrderKey::Invalid);
    assert_eq!(OrderKey::extract("dir/12a_x.jpg", '_'), OrderKey::Invalid);
    assert_eq!(
        OrderKey::extract("dir/99999999999999999999_x.jpg", '_'),
        OrderKey::Invalid
    );
}

#[test]
fn extract_requires_delimiter_after_separator() {
    // The only delimiter sits in the directory name.
    assert_eq!(OrderKey::extract("my_frames/12.jpg", '_'), OrderKey::Invalid);
    assert_eq!(OrderKey::extract("my_frames/12_a.jpg", '_'), OrderKey::Valid(12));
}

#[test]
fn extract_honors_custom_delimiter() {
    assert_eq!(OrderKey::extract("dir/0005-cam.jpg", '-'), OrderKey::Valid(5));
    assert_eq!(OrderKey::extract("dir/0005-cam.jpg", '_'), OrderKey::Invalid);
}

#[test]
fn key_accessors() {
    assert_eq!(OrderKey::Valid(3).index(), Some(3));
    assert_eq!(OrderKey::Invalid.index(), None);
    assert!(OrderKey::Valid(0).is_valid());
    assert!(!OrderKey::Invalid.is_valid());
}

#[test]
fn orders_numerically_not_lexically() {
    let seq = order_candidates(
        paths(&["10_x.jpg", "2_x.jpg", "1_x.jpg"]),
        DEFAULT_DELIMITER,
        MalformedPolicy::Lexical,
    );
    assert_eq!(ordered_names(&seq), ["1_x.jpg", "2_x.jpg", "10_x.jpg"]);
}

#[test]
fn ordering_is_independent_of_input_order() {
    let a = order_candidates(
        paths(&["3_a.jpg", "20_a.png", "1_a.jpg", "cover.jpg", "100_a.jpg"]),
        '_',
        MalformedPolicy::Lexical,
    );
    let b = order_candidates(
        paths(&["cover.jpg", "100_a.jpg", "1_a.jpg", "20_a.png", "3_a.jpg"]),
        '_',
        MalformedPolicy::Lexical,
    );
    assert_eq!(ordered_names(&a), ordered_names(&b));
    assert_eq!(
        ordered_names(&a),
        ["1_a.jpg", "3_a.jpg", "20_a.png", "100_a.jpg", "cover.jpg"]
    );
}

#[test]
fn malformed_entries_go_last_and_are_kept() {
    let seq = order_candidates(
        paths(&["zeta.jpg", "5_a.jpg", "alpha.png", "1_a.jpg"]),
        '_',
        MalformedPolicy::Lexical,
    );
    assert_eq!(
        ordered_names(&seq),
        ["1_a.jpg", "5_a.jpg", "alpha.png", "zeta.jpg"]
    );
    assert_eq!(seq.len(), 4);
    assert_eq!(seq.candidates(), 4);
    assert_eq!(seq.malformed(), 2);
    assert!(seq.excluded.is_empty());
}

#[test]
fn discovery_policy_keeps_listing_order_for_malformed() {
    let seq = order_candidates(
        paths(&["zeta.jpg", "5_a.jpg", "alpha.png", "1_a.jpg", "mid.jpg"]),
        '_',
        MalformedPolicy::Discovery,
    );
    assert_eq!(
        ordered_names(&seq),
        ["1_a.jpg", "5_a.jpg", "zeta.jpg", "alpha.png", "mid.jpg"]
    );
}

#[test]
fn exclude_policy_drops_malformed() {
    let seq = order_candidates(
        paths(&["zeta.jpg", "5_a.jpg", "alpha.png", "1_a.jpg"]),
        '_',
        MalformedPolicy::Exclude,
    );
    assert_eq!(ordered_names(&seq), ["1_a.jpg", "5_a.jpg"]);
    assert_eq!(seq.candidates(), 4);
    assert_eq!(seq.malformed(), 0);
    assert_eq!(
        seq.excluded,
        vec![PathBuf::from("frames/zeta.jpg"), PathBuf::from("frames/alpha.png")]
    );
}

#[test]
fn equal_keys_break_ties_lexically() {
    let seq = order_candidates(
        paths(&["2_b.jpg", "2_a.jpg", "1_z.jpg"]),
        '_',
        MalformedPolicy::Lexical,
    );
    assert_eq!(ordered_names(&seq), ["1_z.jpg", "2_a.jpg", "2_b.jpg"]);
}

#[test]
fn every_candidate_appears_exactly_once() {
    let input = paths(&["4_a.jpg", "x.jpg", "4_a.png", "1_a.jpg", "y.png", "3_a.jpg"]);
    let seq = order_candidates(input.clone(), '_', MalformedPolicy::Lexical);

    let mut got: Vec<PathBuf> = seq.iter().map(|e| e.path.clone()).collect();
    let mut want = input;
    got.sort();
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn discovery_index_is_recorded() {
    let seq = order_candidates(paths(&["9_a.jpg", "1_a.jpg"]), '_', MalformedPolicy::Lexical);
    assert_eq!(seq.entries[0].discovery_index, 1);
    assert_eq!(seq.entries[1].discovery_index, 0);
    assert_eq!(seq.entries[0].key, OrderKey::Valid(1));
}

#[test]
fn compare_is_a_total_order() {
    let e = |name: &str, idx: usize| SequencedEntry {
        path: PathBuf::from(name),
        key: OrderKey::extract(name, '_'),
        discovery_index: idx,
    };
    let a = e("d/1_a.jpg", 0);
    let b = e("d/bad.jpg", 1);
    let c = e("d/1_a.jpg", 2);

    for policy in [
        MalformedPolicy::Lexical,
        MalformedPolicy::Discovery,
        MalformedPolicy::Exclude,
    ] {
        assert_eq!(compare_entries(&a, &b, policy), Ordering::Less);
        assert_eq!(compare_entries(&b, &a, policy), Ordering::Greater);
        assert_eq!(compare_entries(&a, &c, policy), Ordering::Less);
        assert_eq!(compare_entries(&a, &a, policy), Ordering::Equal);
    }
}

#[test]
fn empty_input_yields_empty_sequence() {
    let seq = order_candidates(Vec::new(), '_', MalformedPolicy::Lexical);
    assert!(seq.is_empty());
    assert_eq!(seq.candidates(), 0);
}

#[test]
fn key_serializes_tagged() {
    let json = serde_json::to_string(&OrderKey::Valid(12)).unwrap();
    assert_eq!(json, r#"{"kind":"valid","index":12}"#);
    let json = serde_json::to_string(&OrderKey::Invalid).unwrap();
    assert_eq!(json, r#"{"kind":"invalid"}"#);
}
