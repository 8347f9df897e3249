//! End-to-end tests for every accepted chord-expression form.

use chordspec::{parse, ChordParse, SpecError};
use pcset::{Catalog, ErrorKind, Scope};
use pretty_assertions::assert_eq;

fn catalog() -> Catalog {
    Catalog::builtin()
}

fn parse_ok(text: &str) -> ChordParse {
    parse(text, &catalog()).unwrap_or_else(|e| panic!("{text:?} failed to parse: {e}"))
}

fn parse_err(text: &str) -> SpecError {
    match parse(text, &catalog()) {
        Ok(parsed) => panic!("{text:?} unexpectedly parsed as {parsed}"),
        Err(err) => err,
    }
}

#[test]
fn integer_intervals_are_abstract() {
    let result = parse_ok("[0,3,7]");
    assert_eq!(result.spec.scope, Scope::Abstract);
    assert_eq!(result.spec.intervals, vec![0, 3, 7]);
    assert_eq!(result.root_pc, None);
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert!(result.spec.quality_matches.contains(&"min".to_string()));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn interval_names_normalize_like_integers() {
    let named = parse_ok("[P1, m3, P5]");
    let numeric = parse_ok("[0,3,7]");
    assert_eq!(named.spec.scope, Scope::Abstract);
    assert_eq!(named.spec.intervals, numeric.spec.intervals);
    assert_eq!(named.spec.voicing, numeric.spec.voicing);
    assert_eq!(named.spec.quality_name.as_deref(), Some("min"));
}

#[test]
fn compound_interval_names_keep_register() {
    let result = parse_ok("[P1,M3,P5,M9]");
    assert_eq!(result.spec.voicing, vec![0, 4, 7, 14]);
    assert_eq!(result.spec.intervals, vec![0, 2, 4, 7]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("majadd9"));
}

#[test]
fn scale_degrees_in_parentheses() {
    let result = parse_ok("(1,b3,5)");
    assert_eq!(result.spec.intervals, vec![0, 3, 7]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn scale_degrees_in_square_brackets() {
    let result = parse_ok("[1,3,5,b7]");
    assert_eq!(result.spec.voicing, vec![0, 4, 7, 10]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("7"));
}

#[test]
fn note_names_are_note_scoped() {
    let result = parse_ok("[C,E,G]");
    assert_eq!(result.spec.scope, Scope::Note);
    assert_eq!(result.spec.intervals, vec![0, 4, 7]);
    assert_eq!(result.root_pc, Some(0));
    assert_eq!(result.spec.tokens, vec!["C", "E", "G"]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("maj"));
    assert!(result.spec.voicing.is_empty());
}

#[test]
fn note_root_prefix_sets_the_base() {
    let result = parse_ok("A[C,E,A]");
    assert_eq!(result.root_pc, Some(9));
    assert_eq!(result.spec.intervals, vec![0, 3, 7]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
}

#[test]
fn absolute_note_tokens() {
    let result = parse_ok("[C3,E3,G3]");
    assert_eq!(result.spec.scope, Scope::Absolute);
    assert_eq!(result.spec.absolute_midi(), vec![48, 52, 55]);
    assert_eq!(result.root_pitch.map(|p| p.midi), Some(48));
    assert_eq!(result.spec.quality_name.as_deref(), Some("maj"));
    assert_eq!(result.spec.voicing, vec![0, 4, 7]);
}

#[test]
fn midi_numbers_in_braces() {
    let result = parse_ok("{60,63,67}");
    assert_eq!(result.spec.scope, Scope::Absolute);
    assert_eq!(result.spec.absolute_midi(), vec![60, 63, 67]);
    assert_eq!(result.root_pitch.map(|p| p.midi), Some(60));
    assert_eq!(result.spec.intervals, vec![0, 3, 7]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn midi_root_prefix_may_sit_inside_the_voicing() {
    let result = parse_ok("E3{48,52,55}");
    assert_eq!(result.root_pitch.map(|p| p.midi), Some(52));
    assert_eq!(result.root_pc, Some(4));
    assert_eq!(result.spec.voicing, vec![-4, 0, 3]);
    assert_eq!(result.spec.intervals, vec![0, 3, 8]);
}

#[test]
fn absolute_root_on_intervals() {
    let result = parse_ok("C3[0,3,7]");
    assert_eq!(result.spec.scope, Scope::Absolute);
    assert_eq!(result.spec.absolute_midi(), vec![48, 51, 55]);
    assert_eq!(result.root_pitch.map(|p| p.midi), Some(48));
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
    assert_eq!(result.spec.tokens, vec!["C3", "D#3", "G3"]);
}

#[test]
fn absolute_root_on_degrees() {
    let result = parse_ok("C3(1,b3,5)");
    assert_eq!(result.spec.scope, Scope::Absolute);
    assert_eq!(result.spec.absolute_midi(), vec![48, 51, 55]);
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn pitch_class_root_keeps_written_voicing() {
    let result = parse_ok("D[0,4,7,16]");
    assert_eq!(result.spec.scope, Scope::Note);
    assert_eq!(result.root_pc, Some(2));
    assert_eq!(result.root_pitch, None);
    assert_eq!(result.spec.voicing, vec![0, 4, 7, 16]);
    assert_eq!(result.spec.tokens, vec!["D", "F#", "A", "F#"]);
    assert_eq!(result.spec.intervals, vec![0, 4, 7]);
}

#[test]
fn voicing_preserves_register_and_order() {
    let result = parse_ok("[0,3,15,11]");
    assert_eq!(result.spec.scope, Scope::Abstract);
    assert_eq!(result.spec.intervals, vec![0, 3, 11]);
    assert_eq!(result.spec.voicing, vec![0, 3, 15, 11]);
    assert_eq!(result.spec.quality_name, None);
}

#[test]
fn bare_quality_name() {
    let result = parse_ok("min");
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.scope, Scope::Abstract);
    assert_eq!(result.spec.intervals, vec![0, 3, 7]);
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn rooted_quality_name() {
    let result = parse_ok("C:min");
    assert_eq!(result.spec.scope, Scope::Note);
    assert_eq!(result.root_pc, Some(0));
    assert_eq!(result.spec.tokens[0], "C");
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn rooted_quality_with_octave() {
    let result = parse_ok("C3:min");
    assert_eq!(result.spec.scope, Scope::Absolute);
    assert_eq!(result.spec.absolute_midi()[0], 48);
    assert_eq!(result.spec.quality_name.as_deref(), Some("min"));
    assert_eq!(result.spec.voicing, vec![0, 3, 7]);
}

#[test]
fn quality_tensions_carry_through() {
    let result = parse_ok("G:7alt");
    assert_eq!(result.spec.tensions, vec![1, 3, 6, 8]);
    assert_eq!(result.spec.quality_name.as_deref(), Some("7alt"));
    assert_eq!(result.to_chord().unwrap().root_pc, 7);
}

#[test]
fn alias_is_trimmed_and_stored() {
    let result = parse_ok("[0, 4, 7] = home");
    assert_eq!(result.spec.label.as_deref(), Some("home"));
    assert_eq!(result.spec.intervals, vec![0, 4, 7]);
    assert_eq!(parse_ok("maj=").spec.label, None);
}

#[test]
fn subset_classification() {
    let result = parse_ok("[0,4]");
    let maj = result
        .spec
        .quality_subsets
        .iter()
        .find(|v| v.name == "maj")
        .expect("maj should be listed as a subset");
    assert_eq!(maj.missing, vec![7]);
    assert!(maj.extra.is_empty());
    assert_eq!(maj.distance, 1);
}

#[test]
fn superset_classification() {
    let result = parse_ok("[0,3,7,10]");
    let min = result
        .spec
        .quality_supersets
        .iter()
        .find(|v| v.name == "min")
        .expect("min should be listed as a superset");
    assert_eq!(min.extra, vec![10]);
    assert!(min.missing.is_empty());
}

#[test]
fn cousin_classification() {
    let result = parse_ok("[0,4,5]");
    let maj = result
        .spec
        .quality_cousins
        .iter()
        .find(|v| v.name == "maj")
        .expect("maj should be listed as a cousin");
    assert_eq!(maj.missing, vec![7]);
    assert_eq!(maj.extra, vec![5]);
}

#[test]
fn variant_buckets_are_ordered_and_capped() {
    let result = parse_ok("[0]");
    let subsets = &result.spec.quality_subsets;
    assert_eq!(subsets.len(), chordspec::VARIANT_LIMIT);
    for pair in subsets.windows(2) {
        assert!((pair[0].distance, &pair[0].name) <= (pair[1].distance, &pair[1].name));
    }
    assert_eq!(subsets[0].name, "power");
}

#[test]
fn canonical_text_reparses_to_the_same_spec() {
    for text in [
        "[0,3,7]",
        "[0,3,15,11]",
        "[P1,m3,P5]",
        "(1,b3,5,b7)",
        "[C,E,G]",
        "[E,G,C]",
        "D[0,4,7,16]",
        "C3[0,3,7]",
        "[C3,E3,G3]",
        "{60,63,67}",
        "E3{48,52,55}",
        "min",
        "C:min",
        "Bb2:maj7",
        "[0,4,7]=home",
    ] {
        let first = parse_ok(text);
        let canonical = first.to_string();
        let second = parse_ok(&canonical);
        assert_eq!(second.spec.scope, first.spec.scope, "scope for {text} via {canonical}");
        assert_eq!(second.spec.intervals, first.spec.intervals, "intervals for {text} via {canonical}");
        assert_eq!(second.spec.voicing, first.spec.voicing, "voicing for {text} via {canonical}");
        assert_eq!(second.spec.label, first.spec.label);
        assert_eq!(second.to_string(), canonical);
    }
}

#[test]
fn canonical_text_shapes() {
    assert_eq!(parse_ok("min").to_string(), "[0,3,7]");
    assert_eq!(parse_ok("C:min").to_string(), "C[0,3,7]");
    assert_eq!(parse_ok("[C,E,G]").to_string(), "C[C,E,G]");
    assert_eq!(parse_ok("{60,63,67}=x").to_string(), "C4{60,63,67}=x");
}

#[test]
fn empty_expressions_are_rejected() {
    assert!(matches!(parse_err(""), SpecError::Empty));
    assert!(matches!(parse_err("   "), SpecError::Empty));
    assert!(matches!(parse_err("=label"), SpecError::Empty));
}

#[test]
fn unclosed_brackets_are_rejected() {
    assert!(matches!(
        parse_err("[0,4,7"),
        SpecError::UnclosedBracket { open: '[', close: ']' }
    ));
    assert!(matches!(
        parse_err("C(1,3"),
        SpecError::UnclosedBracket { open: '(', .. }
    ));
    assert!(matches!(parse_err("{60,64"), SpecError::UnclosedBracket { .. }));
}

#[test]
fn empty_payload_is_rejected() {
    assert!(matches!(parse_err("[]"), SpecError::EmptyPayload));
    assert!(matches!(parse_err("C3[ , ]"), SpecError::EmptyPayload));
}

#[test]
fn mixed_note_tokens_are_rejected() {
    assert!(matches!(parse_err("[C3,E,G]"), SpecError::MixedPitchTokens));
}

#[test]
fn unrecognized_tokens_name_the_token() {
    match parse_err("[C,H,G]") {
        SpecError::UnrecognizedToken { token } => assert_eq!(token, "H"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(parse_err("(1,x3,5)"), SpecError::UnrecognizedToken { .. }));
    assert!(matches!(parse_err("(0,3)"), SpecError::UnrecognizedToken { .. }));
    assert!(matches!(parse_err("Q[0,4,7]"), SpecError::UnrecognizedToken { .. }));
}

#[test]
fn offsets_past_i32_are_range_errors() {
    for text in [
        "C4[2147483647]",
        "{2147483647,-2147483648}",
        "{-2147483648,2147483647}",
        "(1,4294967295)",
        "(b4294967295)",
        "[99999999999]",
        "C2147483647:maj",
        "C2147483647[0]",
    ] {
        assert_eq!(parse_err(text).kind(), ErrorKind::Range, "{text}");
    }
    assert!(matches!(
        parse_err("{2147483647,-2147483648}"),
        SpecError::OffsetOutOfRange { .. }
    ));

    // Note-scoped roots only need the offset's pitch class.
    let result = parse_ok("C[2147483647]");
    assert_eq!(result.spec.scope, Scope::Note);
    assert_eq!(result.spec.tokens, vec!["G"]);
}

#[test]
fn invalid_interval_quality_is_rejected() {
    assert!(matches!(
        parse_err("[M1,M3]"),
        SpecError::InvalidIntervalQuality { quality: 'M', number: 1 }
    ));
    assert!(matches!(
        parse_err("[P1,m5]"),
        SpecError::InvalidIntervalQuality { quality: 'm', number: 5 }
    ));
}

#[test]
fn midi_braces_require_integers() {
    match parse_err("{60,E4}") {
        SpecError::ExpectedInteger { token } => assert_eq!(token, "E4"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unknown_quality_names() {
    match parse_err("C:nonsense") {
        SpecError::UnknownQuality { name } => assert_eq!(name, "nonsense"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(parse_err("nonsense"), SpecError::UnknownQuality { .. }));
    assert_eq!(parse_err("nonsense").kind(), ErrorKind::UnknownCatalogEntry);
    assert_eq!(parse_err("[0,4").kind(), ErrorKind::Parse);
}

#[test]
fn quality_is_resolved_before_root() {
    assert!(matches!(parse_err("H:nonsense"), SpecError::UnknownQuality { .. }));
    assert!(matches!(parse_err("H:maj"), SpecError::UnrecognizedToken { .. }));
}

#[test]
fn empty_catalog_skips_annotation() {
    let result = parse("[0,4,7]", &Catalog::new()).unwrap();
    assert_eq!(result.spec.quality_name, None);
    assert!(result.spec.quality_matches.is_empty());
    assert!(result.spec.quality_subsets.is_empty());
}
