//! Property-based tests for the Fallback Compiler
//!
//! Tests invariants:
//! - Never panics and is deterministic
//! - Non-blank input always yields non-blank output
//! - Output never introduces unknown search keys

use proptest::prelude::*;

use crate::core::grammar::validator::validate;
use crate::core::translate::fallback::compile;

/// Lowercase sentences drawn from a card-search vocabulary plus noise words
fn arb_sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::sample::select(vec![
                "cheap", "red", "blue", "creatures", "instant", "board", "wipes", "mana",
                "rocks", "draw", "with", "the", "flying", "expensive", "ramp", "that",
            ])
            .prop_map(str::to_string),
            "[a-z]{2,9}",
        ],
        1..8,
    )
    .prop_map(|words| words.join(" "))
}

proptest! {
    /// Property: same input, same output
    #[test]
    fn prop_deterministic(input in ".{0,60}") {
        prop_assert_eq!(compile(&input), compile(&input));
    }

    /// Property: something usable comes back for any non-blank input
    #[test]
    fn prop_non_blank_output(input in "[a-zA-Z ,.!?]{0,60}") {
        let output = compile(&input);
        if input.trim().is_empty() {
            prop_assert!(output.is_empty());
        } else {
            prop_assert!(!output.trim().is_empty());
        }
    }

    /// Property: compiled output only uses known keys
    #[test]
    fn prop_no_unknown_keys(input in arb_sentence()) {
        let outcome = validate(&compile(&input));
        prop_assert!(
            !outcome.issues.iter().any(|i| i.starts_with("Unknown")),
            "issues: {:?}",
            outcome.issues
        );
    }
}
