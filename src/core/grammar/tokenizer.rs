//! Grammar Tokenizer
//!
//! Splits a grammar query into terms, parenthesized groups and `OR`
//! connectives. Double-quoted phrases and `/regex/` literals are opaque:
//! spaces and parentheses inside them never split a token.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// Comparison operator between a key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Colon,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Longest-first so `<=` is never read as `<` followed by `=`.
    const ALL: [(&'static str, Operator); 7] = [
        ("!=", Operator::NotEq),
        ("<=", Operator::Le),
        (">=", Operator::Ge),
        (":", Operator::Colon),
        ("=", Operator::Eq),
        ("<", Operator::Lt),
        (">", Operator::Gt),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Colon => ":",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// Parse an operator at the start of `s`, returning it and its length.
    pub fn parse_prefix(s: &str) -> Option<(Operator, usize)> {
        Self::ALL
            .iter()
            .find(|(text, _)| s.starts_with(text))
            .map(|(text, op)| (*op, text.len()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `key<op>value` view of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermParts<'a> {
    pub negated: bool,
    pub key: &'a str,
    pub op: Operator,
    pub value: &'a str,
}

/// A single space-free unit of the grammar: `key<op>value`, a bare word,
/// a quoted phrase, or a regex literal, optionally negated with `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    raw: String,
}

impl Term {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.raw.starts_with('-')
    }

    /// Split into key, operator and value. Returns `None` for bare words,
    /// quoted phrases, exact-name (`!`) terms and anything without a
    /// leading alphabetic key followed by an operator.
    pub fn parts(&self) -> Option<TermParts<'_>> {
        let (negated, body) = match self.raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.raw.as_str()),
        };

        let key_len = body
            .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
            .unwrap_or(body.len());
        if key_len == 0 {
            return None;
        }

        let (key, rest) = body.split_at(key_len);
        let (op, op_len) = Operator::parse_prefix(rest)?;

        Some(TermParts {
            negated,
            key,
            op,
            value: &rest[op_len..],
        })
    }
}

/// A parenthesized sub-query, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub negated: bool,
    pub items: Vec<GrammarToken>,
}

/// One token of a grammar query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarToken {
    Term(Term),
    Group(Group),
    Or,
}

impl GrammarToken {
    pub fn term(raw: impl Into<String>) -> Self {
        GrammarToken::Term(Term::new(raw))
    }

    pub fn is_or(&self) -> bool {
        matches!(self, GrammarToken::Or)
    }
}

impl fmt::Display for GrammarToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarToken::Term(term) => f.write_str(term.raw()),
            GrammarToken::Or => f.write_str("OR"),
            GrammarToken::Group(group) => {
                if group.negated {
                    f.write_str("-")?;
                }
                write!(f, "({})", render(&group.items))
            }
        }
    }
}

/// Join tokens back into a single-spaced query string.
pub fn render(tokens: &[GrammarToken]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a `/` following `prev` opens a regex literal.
pub(crate) fn opens_regex(prev: Option<char>) -> bool {
    matches!(prev, Some(':' | '=' | '<' | '>'))
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Tokenize a grammar query.
///
/// Unbalanced input is tolerated: an unterminated phrase or regex runs to
/// the end of input, an unclosed group closes at the end of input, and a
/// stray `)` is ignored. The validator balances delimiters before calling
/// this so the rendered output always round-trips.
pub fn tokenize(input: &str) -> Vec<GrammarToken> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    parse_sequence(&chars, &mut pos, false)
}

fn parse_sequence(chars: &[char], pos: &mut usize, nested: bool) -> Vec<GrammarToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    while *pos < chars.len() {
        let ch = chars[*pos];
        *pos += 1;

        match ch {
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            '"' => {
                current.push('"');
                consume_until(chars, pos, &mut current, '"', false);
            }
            '/' if opens_regex(current.chars().last()) => {
                current.push('/');
                consume_until(chars, pos, &mut current, '/', true);
            }
            // Every unquoted parenthesis is structural; `name:foo(bar)` reads
            // as `name:foo (bar)`.
            '(' => {
                let negated = current == "-";
                if negated {
                    current.clear();
                } else {
                    flush(&mut current, &mut tokens);
                }
                let items = parse_sequence(chars, pos, true);
                tokens.push(GrammarToken::Group(Group { negated, items }));
            }
            ')' if nested => {
                flush(&mut current, &mut tokens);
                return tokens;
            }
            ')' => {}
            _ => current.push(ch),
        }
    }

    flush(&mut current, &mut tokens);
    tokens
}

/// Copy characters into `current` up to and including `close`.
fn consume_until(chars: &[char], pos: &mut usize, current: &mut String, close: char, escapes: bool) {
    while *pos < chars.len() {
        let ch = chars[*pos];
        *pos += 1;
        current.push(ch);

        if escapes && ch == '\\' {
            if let Some(&next) = chars.get(*pos) {
                current.push(next);
                *pos += 1;
            }
            continue;
        }
        if ch == close {
            return;
        }
    }
}

fn flush(current: &mut String, tokens: &mut Vec<GrammarToken>) {
    if current.is_empty() {
        return;
    }
    let word = std::mem::take(current);
    if word == "OR" {
        tokens.push(GrammarToken::Or);
    } else {
        tokens.push(GrammarToken::Term(Term::new(word)));
    }
}
