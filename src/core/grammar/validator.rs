//! Grammar Validator
//!
//! Normalizes and sanitizes a candidate grammar query:
//! 1. Collapse whitespace
//! 2. Strip power+toughness arithmetic (unsupported by the backend)
//! 3. Balance quotes, regex literals and parentheses
//! 4. Tokenize and fold top-level `a OR b OR c` into `(a OR b OR c)`
//! 5. Repair known malformed terms (year-as-set, doubled operators)
//! 6. Drop terms with unknown keys or unknown oracle tags
//!
//! Every change is recorded as an issue. The sanitized query is always
//! returned, so callers always have something executable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::tokenizer::{opens_regex, render, tokenize, GrammarToken, Group, Term};
use super::vocabulary::{is_known_key, is_known_tag, is_tag_key};

// ============================================================================
// Patterns
// ============================================================================

static POWER_TOUGHNESS_SUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)-?\(?\b(?:(?:pow|power)\+(?:tou|toughness)|(?:tou|toughness)\+(?:pow|power))\b\)?(?:<=|>=|!=|=|<|>|:)\d+",
    )
    .expect("power+toughness pattern is valid")
});

static YEAR_AS_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?)(?i:e|s|set|edition):(\d{4})$").expect("year-as-set pattern is valid")
});

static DOUBLED_OPERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?)([A-Za-z_]+):(<=|>=|!=|<|>|=)(\S+)$").expect("doubled operator pattern is valid")
});

// ============================================================================
// Validation Result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True iff the input needed no repair and used only known vocabulary
    pub valid: bool,
    pub sanitized: String,
    pub issues: Vec<String>,
}

/// Unknown vocabulary collected while walking the token tree.
#[derive(Debug, Default)]
struct VocabularyReport {
    unknown_keys: Vec<String>,
    unknown_tags: Vec<String>,
}

impl VocabularyReport {
    fn note_key(&mut self, key: &str) {
        if !self.unknown_keys.iter().any(|k| k == key) {
            self.unknown_keys.push(key.to_string());
        }
    }

    fn note_tag(&mut self, tag: &str) {
        if !self.unknown_tags.iter().any(|t| t == tag) {
            self.unknown_tags.push(tag.to_string());
        }
    }
}

// ============================================================================
// Grammar Validator
// ============================================================================

/// Validates and sanitizes grammar queries against the known vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarValidator;

impl GrammarValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a candidate query. Never fails; see [`ValidationOutcome`].
    pub fn validate(&self, query: &str) -> ValidationOutcome {
        let mut issues = Vec::new();

        let collapsed = collapse_whitespace(query);
        let balanced = normalize_delimiters(&collapsed, &mut issues);

        let tokens = fold_or_sequences(tokenize(&balanced), &mut issues);

        let mut report = VocabularyReport::default();
        let tokens = sanitize_tokens(tokens, &mut issues, &mut report);

        if !report.unknown_keys.is_empty() {
            issues.push(format!(
                "Unknown search key(s): {}",
                report.unknown_keys.join(", ")
            ));
        }
        if !report.unknown_tags.is_empty() {
            issues.push(format!(
                "Unknown oracle tag(s): {}",
                report.unknown_tags.join(", ")
            ));
        }

        let sanitized = collapse_whitespace(&render(&tokens));
        if !issues.is_empty() {
            tracing::debug!(
                original = %query,
                sanitized = %sanitized,
                issues = ?issues,
                "Grammar query sanitized"
            );
        }

        ValidationOutcome {
            valid: issues.is_empty(),
            sanitized,
            issues,
        }
    }

    /// Does the text read as grammar rather than natural language? True when
    /// it contains at least one `key<op>value` term with a known key.
    pub fn looks_like_grammar(&self, text: &str) -> bool {
        fn any_known(tokens: &[GrammarToken]) -> bool {
            tokens.iter().any(|token| match token {
                GrammarToken::Term(term) => term.parts().is_some_and(|p| is_known_key(p.key)),
                GrammarToken::Group(group) => any_known(&group.items),
                GrammarToken::Or => false,
            })
        }
        any_known(&tokenize(&collapse_whitespace(text)))
    }
}

/// Validate with the default validator.
pub fn validate(query: &str) -> ValidationOutcome {
    GrammarValidator.validate(query)
}

// ============================================================================
// Passes
// ============================================================================

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_issue(issues: &mut Vec<String>, issue: String) {
    if !issues.contains(&issue) {
        issues.push(issue);
    }
}

/// Strip power+toughness comparisons and balance delimiters until neither
/// changes the text. Dropping a stray `)` can expose a new comparison, and
/// stripping one can unbalance a group.
fn normalize_delimiters(text: &str, issues: &mut Vec<String>) -> String {
    let mut current = strip_power_toughness_sums(text, issues);
    current = balance_delimiters(&current, issues);
    while has_power_toughness_sum(&current) {
        current = strip_power_toughness_sums(&current, issues);
        current = balance_delimiters(&current, issues);
    }
    current
}

fn has_power_toughness_sum(text: &str) -> bool {
    scan_spans(text).into_iter().any(|(state, range)| {
        state == ScanState::Normal && POWER_TOUGHNESS_SUM.is_match(&text[range])
    })
}

/// Remove `pow+tou>=N` style comparisons (with any leading negation) from
/// unquoted text, repeating until none remain. Phrases and regex literals are
/// left alone.
fn strip_power_toughness_sums(text: &str, issues: &mut Vec<String>) -> String {
    if !has_power_toughness_sum(text) {
        return text.to_string();
    }

    let mut current = text.to_string();
    while has_power_toughness_sum(&current) {
        let mut out = String::with_capacity(current.len());
        for (state, range) in scan_spans(&current) {
            let span = &current[range];
            if state == ScanState::Normal {
                out.push_str(&POWER_TOUGHNESS_SUM.replace_all(span, " "));
            } else {
                out.push_str(span);
            }
        }
        current = out;
    }
    push_issue(
        issues,
        "Removed unsupported power+toughness comparison(s)".to_string(),
    );
    collapse_whitespace(&current)
}

/// Split text into byte ranges by scan state. Opaque spans include their
/// delimiters; an unterminated phrase or regex runs to the end.
fn scan_spans(text: &str) -> Vec<(ScanState, std::ops::Range<usize>)> {
    let mut spans = Vec::new();
    let mut state = ScanState::Normal;
    let mut start = 0usize;
    let mut prev: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        match state {
            ScanState::Quote => {
                if ch == '"' {
                    spans.push((state, start..idx + 1));
                    state = ScanState::Normal;
                    start = idx + 1;
                    prev = Some(ch);
                }
            }
            ScanState::Regex => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '/' {
                    spans.push((state, start..idx + 1));
                    state = ScanState::Normal;
                    start = idx + 1;
                    prev = Some(ch);
                }
            }
            ScanState::Normal => {
                let opens = match ch {
                    '"' => Some(ScanState::Quote),
                    '/' if opens_regex(prev) => Some(ScanState::Regex),
                    _ => None,
                };
                if let Some(next) = opens {
                    if start < idx {
                        spans.push((ScanState::Normal, start..idx));
                    }
                    state = next;
                    start = idx;
                }
                prev = if ch == ' ' { None } else { Some(ch) };
            }
        }
    }
    if start < text.len() {
        spans.push((state, start..text.len()));
    }
    spans
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    Quote,
    Regex,
}

/// Close unterminated phrases and regex literals, drop unmatched `)`, and
/// close unclosed `(`. Uses the same regex-opening rule as the tokenizer.
fn balance_delimiters(text: &str, issues: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut state = ScanState::Normal;
    let mut prev: Option<char> = None;
    let mut depth = 0usize;
    let mut stray = 0usize;
    let mut dangling_escape = false;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::Quote => {
                out.push(ch);
                if ch == '"' {
                    state = ScanState::Normal;
                    prev = Some(ch);
                }
            }
            ScanState::Regex => {
                out.push(ch);
                if ch == '\\' {
                    match chars.next() {
                        Some(next) => out.push(next),
                        None => dangling_escape = true,
                    }
                } else if ch == '/' {
                    state = ScanState::Normal;
                    prev = Some(ch);
                }
            }
            ScanState::Normal => {
                match ch {
                    '"' => state = ScanState::Quote,
                    '/' if opens_regex(prev) => state = ScanState::Regex,
                    '(' => depth += 1,
                    ')' if depth == 0 => {
                        stray += 1;
                        continue;
                    }
                    ')' => depth -= 1,
                    _ => {}
                }
                out.push(ch);
                prev = if ch == ' ' { None } else { Some(ch) };
            }
        }
    }

    match state {
        ScanState::Quote => {
            out.push('"');
            push_issue(issues, "Closed unterminated quoted phrase".to_string());
        }
        ScanState::Regex => {
            if dangling_escape {
                out.pop();
            }
            out.push('/');
            push_issue(issues, "Closed unterminated regular expression".to_string());
        }
        ScanState::Normal => {}
    }

    if stray > 0 {
        push_issue(issues, format!("Removed {stray} unmatched closing parenthesis"));
    }
    if depth > 0 {
        out.extend(std::iter::repeat(')').take(depth));
        push_issue(issues, format!("Closed {depth} unclosed parenthesis"));
    }

    out
}

/// Fold top-level `a OR b OR c` runs into a single group. Bare adjacency is
/// AND in the backend, so an ungrouped OR is ambiguous.
fn fold_or_sequences(tokens: Vec<GrammarToken>, issues: &mut Vec<String>) -> Vec<GrammarToken> {
    let mut out: Vec<GrammarToken> = Vec::with_capacity(tokens.len());
    // Whether `out.last()` is a group built here and may be extended.
    let mut chain_open = false;
    let mut pending_or = false;
    let mut dangling = 0usize;

    for token in tokens {
        if token.is_or() {
            if pending_or || out.is_empty() {
                dangling += 1;
            } else {
                pending_or = true;
            }
            continue;
        }

        if !pending_or {
            chain_open = false;
            out.push(token);
            continue;
        }

        pending_or = false;
        match out.pop() {
            Some(GrammarToken::Group(mut group)) if chain_open => {
                group.items.push(GrammarToken::Or);
                group.items.push(token);
                out.push(GrammarToken::Group(group));
            }
            Some(prev) => {
                out.push(GrammarToken::Group(Group {
                    negated: false,
                    items: vec![prev, GrammarToken::Or, token],
                }));
                chain_open = true;
            }
            None => out.push(token),
        }
    }

    if pending_or {
        dangling += 1;
    }
    if dangling > 0 {
        push_issue(issues, "Removed dangling OR connective".to_string());
    }

    out
}

/// Repair and filter terms recursively, dropping emptied groups.
fn sanitize_tokens(
    tokens: Vec<GrammarToken>,
    issues: &mut Vec<String>,
    report: &mut VocabularyReport,
) -> Vec<GrammarToken> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            GrammarToken::Or => out.push(GrammarToken::Or),
            GrammarToken::Term(term) => {
                let term = repair_term(term, issues);
                if keep_term(&term, report) {
                    out.push(GrammarToken::Term(term));
                }
            }
            GrammarToken::Group(group) => {
                let was_empty = group.items.is_empty();
                let items = sanitize_tokens(group.items, issues, report);
                if items.is_empty() {
                    if was_empty {
                        push_issue(issues, "Removed empty group".to_string());
                    }
                    continue;
                }
                out.push(GrammarToken::Group(Group {
                    negated: group.negated,
                    items,
                }));
            }
        }
    }

    if remove_dangling_or(&mut out) {
        push_issue(issues, "Removed dangling OR connective".to_string());
    }
    out
}

/// Drop leading, trailing and doubled `OR` tokens. Returns true if any were removed.
fn remove_dangling_or(tokens: &mut Vec<GrammarToken>) -> bool {
    let before = tokens.len();
    let mut cleaned: Vec<GrammarToken> = Vec::with_capacity(before);

    for token in tokens.drain(..) {
        if token.is_or() && cleaned.last().map_or(true, GrammarToken::is_or) {
            continue;
        }
        cleaned.push(token);
    }
    if cleaned.last().is_some_and(GrammarToken::is_or) {
        cleaned.pop();
    }

    *tokens = cleaned;
    tokens.len() != before
}

fn repair_term(term: Term, issues: &mut Vec<String>) -> Term {
    let raw = term.raw();

    if let Some(caps) = YEAR_AS_SET.captures(raw) {
        let repaired = format!("{}year={}", &caps[1], &caps[2]);
        issues.push(format!(
            "'{raw}' uses a year as a set code; rewrote to '{repaired}'"
        ));
        return Term::new(repaired);
    }

    if let Some(caps) = DOUBLED_OPERATOR.captures(raw) {
        let repaired = format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4]);
        issues.push(format!("Removed redundant ':' in '{raw}'; rewrote to '{repaired}'"));
        return Term::new(repaired);
    }

    term
}

fn keep_term(term: &Term, report: &mut VocabularyReport) -> bool {
    let Some(parts) = term.parts() else {
        return true;
    };

    if !is_known_key(parts.key) {
        report.note_key(parts.key);
        return false;
    }

    if is_tag_key(parts.key) {
        let tag = parts.value.trim_matches('"');
        if !is_known_tag(tag) {
            report.note_tag(tag);
            return false;
        }
    }

    true
}
