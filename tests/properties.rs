//! Property-based tests for compilation and matching.

use backtrack_re::{compile, compile_with, Backtrack, Options};
use proptest::prelude::*;

/// Patterns over a small alphabet so that matches are common.
fn pattern_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => prop::sample::select(vec!["a", "b", "."]),
            1 => Just("*"),
            1 => Just("|"),
            1 => Just("("),
            1 => Just(")"),
        ],
        0..10,
    )
    .prop_map(|parts| parts.concat())
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[ab]{0,8}"
}

proptest! {
    #[test]
    fn lenient_compilation_never_fails(pattern in pattern_strategy()) {
        prop_assert!(compile(&pattern).is_ok());
    }

    #[test]
    fn matching_is_deterministic(pattern in pattern_strategy(), text in text_strategy()) {
        let compiled = compile(&pattern).unwrap();
        let first = compiled.is_match(&text);
        prop_assert_eq!(compiled.is_match(&text), first);
        prop_assert_eq!(compiled.captures(&text).is_some(), first);
    }

    #[test]
    fn compiling_twice_yields_same_tree(pattern in pattern_strategy(), text in text_strategy()) {
        let once = compile(&pattern).unwrap();
        let twice = compile(&pattern).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.is_match(&text), twice.is_match(&text));
    }

    #[test]
    fn full_backtracking_accepts_everything_committed_does(
        pattern in pattern_strategy(),
        text in text_strategy(),
    ) {
        let committed = compile(&pattern).unwrap();
        let options = Options::default().with_backtrack(Backtrack::Full);
        let full = compile_with(&pattern, options).unwrap();
        if committed.is_match(&text) {
            prop_assert!(full.is_match(&text));
        }
    }

    #[test]
    fn literal_pattern_matches_only_itself(literal in "[a-z]{0,6}", text in "[a-z]{0,6}") {
        let compiled = compile(&literal).unwrap();
        prop_assert_eq!(compiled.is_match(&text), literal == text);
    }

    #[test]
    fn match_is_anchored(text in "[ab]{1,6}") {
        let compiled = compile(&text).unwrap();
        let longer = format!("{text}a");
        let shifted = format!("a{text}");
        prop_assert!(!compiled.is_match(&longer));
        prop_assert!(!compiled.is_match(&shifted));
    }

    #[test]
    fn dot_star_matches_anything(text in any::<String>()) {
        prop_assert!(compile(".*").unwrap().is_match(&text));
    }
}
