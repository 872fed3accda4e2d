//! Property-based tests for the Grammar Validator
//!
//! Tests invariants:
//! - Validation is idempotent for any input
//! - Top-level OR runs fold into exactly one group
//! - Unknown keys are always removed and reported
//! - Sanitized output never contains unbalanced parentheses

use proptest::prelude::*;

use crate::core::grammar::validator::validate;
use crate::core::grammar::vocabulary::is_known_key;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Known-good terms
fn arb_term() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "t:elf",
        "c:r",
        "mv<=3",
        "pow>=4",
        "kw:flying",
        "otag:ramp",
        "o:\"draw a card\"",
        "-t:human",
        "f:commander",
        "id<=wub",
        "goblin",
    ])
    .prop_map(str::to_string)
}

/// Spacing between tokens, including doubled spaces and tabs
fn arb_gap() -> impl Strategy<Value = String> {
    prop::sample::select(vec![" ", "  ", "\t", " \n "]).prop_map(str::to_string)
}

/// Grammar-flavored noise: keys, operators, quotes, parens, slashes, OR
fn arb_grammarish() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            arb_term(),
            Just("OR".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just("\"".to_string()),
            Just("o:/".to_string()),
            Just("e:2024".to_string()),
            Just("mv:<=3".to_string()),
            Just("pow+tou>=10".to_string()),
            Just("otag:bogus-tag".to_string()),
            Just("zz:top".to_string()),
            Just("-(".to_string()),
            "[a-z]{1,6}".prop_map(|s| s),
        ],
        0..12,
    )
    .prop_map(|parts| parts.join(" "))
}

fn paren_depth_ok(query: &str) -> bool {
    let mut depth = 0i32;
    let mut in_quote = false;
    for ch in query.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    /// Property: validating sanitized output again changes nothing
    #[test]
    fn prop_idempotent_on_arbitrary_text(input in ".{0,80}") {
        let first = validate(&input);
        let second = validate(&first.sanitized);
        prop_assert_eq!(&second.sanitized, &first.sanitized);
        prop_assert!(second.issues.is_empty(), "issues on second pass: {:?}", second.issues);
    }

    /// Property: idempotence holds for grammar-shaped noise too
    #[test]
    fn prop_idempotent_on_grammarish(input in arb_grammarish()) {
        let first = validate(&input);
        let second = validate(&first.sanitized);
        prop_assert_eq!(&second.sanitized, &first.sanitized);
        prop_assert!(second.issues.is_empty(), "issues on second pass: {:?}", second.issues);
    }

    /// Property: `a OR b OR c` at top level folds into one group
    #[test]
    fn prop_or_run_folds_once(
        a in arb_term(),
        b in arb_term(),
        c in arb_term(),
        g1 in arb_gap(),
        g2 in arb_gap(),
        g3 in arb_gap(),
        g4 in arb_gap(),
    ) {
        let input = format!("{a}{g1}OR{g2}{b}{g3}OR{g4}{c}");
        let outcome = validate(&input);
        let group = format!("({a} OR {b} OR {c})");
        prop_assert_eq!(outcome.sanitized.matches(&group).count(), 1);
        prop_assert!(outcome.valid);
    }

    /// Property: an unknown key never survives
    #[test]
    fn prop_unknown_key_removed(key in "[a-z]{3,8}", value in "[a-z0-9]{1,6}") {
        prop_assume!(!is_known_key(&key));
        let term = format!("{key}:{value}");
        let outcome = validate(&format!("t:elf {term}"));
        prop_assert_eq!(outcome.sanitized.as_str(), "t:elf");
        let expected_issue = format!("Unknown search key(s): {key}");
        prop_assert!(outcome.issues.contains(&expected_issue));
    }

    /// Property: parentheses outside quotes are always balanced
    #[test]
    fn prop_parens_balanced(input in arb_grammarish()) {
        // Parentheses inside regex literals are not structural.
        prop_assume!(!input.contains('/'));
        let outcome = validate(&input);
        prop_assert!(paren_depth_ok(&outcome.sanitized), "unbalanced: {}", outcome.sanitized);
    }
}
