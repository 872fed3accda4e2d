//! Fallback Compiler
//!
//! Local, table-driven natural language to grammar compiler. Runs when the
//! primary translator is slow, failing or unreachable, so it never does I/O
//! and never fails.

use std::collections::HashSet;

// ============================================================================
// Constants - Slang Phrases
// ============================================================================

/// Multi-word and jargon phrases, matched longest-first.
const SLANG: &[(&str, &str)] = &[
    ("board wipes", "otag:board-wipe"),
    ("board wipe", "otag:board-wipe"),
    ("wraths", "otag:board-wipe"),
    ("sweepers", "otag:sweeper"),
    ("mana rocks", "t:artifact o:\"{T}: Add\""),
    ("mana rock", "t:artifact o:\"{T}: Add\""),
    ("mana dorks", "t:creature o:\"{T}: Add\""),
    ("mana dork", "t:creature o:\"{T}: Add\""),
    ("counter spells", "otag:counterspell"),
    ("counterspells", "otag:counterspell"),
    ("spot removal", "otag:removal"),
    ("removal", "otag:removal"),
    ("card draw", "otag:draw"),
    ("draw cards", "otag:draw"),
    ("ramp", "otag:ramp"),
    ("tutors", "otag:tutor"),
    ("tutor", "otag:tutor"),
    ("burn", "otag:burn"),
    ("life gain", "otag:lifegain"),
    ("lifegain", "otag:lifegain"),
    ("token makers", "otag:token-generator"),
    ("make tokens", "otag:token-generator"),
    ("reanimation", "otag:reanimation"),
    ("reanimate", "otag:reanimation"),
    ("blink", "otag:flicker"),
    ("flicker", "otag:flicker"),
    ("sac outlets", "otag:sacrifice-outlet"),
    ("sacrifice outlets", "otag:sacrifice-outlet"),
    ("etb", "o:\"enters the battlefield\""),
    ("enters the battlefield", "o:\"enters the battlefield\""),
    ("commanders", "is:commander"),
    ("legendary creatures", "t:legendary t:creature"),
    ("fliers", "kw:flying"),
    ("flyers", "kw:flying"),
    ("extra turns", "otag:extra-turn"),
    ("mill", "otag:mill"),
    ("discard", "otag:discard"),
];

// ============================================================================
// Constants - Single-Word Tables
// ============================================================================

pub(crate) const COLORS: &[(&str, &str)] = &[
    ("white", "c:w"),
    ("blue", "c:u"),
    ("black", "c:b"),
    ("red", "c:r"),
    ("green", "c:g"),
    ("colorless", "c:c"),
    ("multicolor", "c:m"),
    ("multicolored", "c:m"),
];

pub(crate) const TYPES: &[(&str, &str)] = &[
    ("creature", "t:creature"),
    ("creatures", "t:creature"),
    ("instant", "t:instant"),
    ("instants", "t:instant"),
    ("sorcery", "t:sorcery"),
    ("sorceries", "t:sorcery"),
    ("artifact", "t:artifact"),
    ("artifacts", "t:artifact"),
    ("enchantment", "t:enchantment"),
    ("enchantments", "t:enchantment"),
    ("planeswalker", "t:planeswalker"),
    ("planeswalkers", "t:planeswalker"),
    ("land", "t:land"),
    ("lands", "t:land"),
    ("battle", "t:battle"),
    ("battles", "t:battle"),
    ("equipment", "t:equipment"),
    ("aura", "t:aura"),
    ("auras", "t:aura"),
    ("vehicle", "t:vehicle"),
    ("vehicles", "t:vehicle"),
    ("legendary", "t:legendary"),
];

const LOW_COST: &str = "mv<=3";
const HIGH_COST: &str = "mv>=5";

const COST_WORDS: &[(&str, &str)] = &[
    ("cheap", LOW_COST),
    ("low", LOW_COST),
    ("inexpensive", LOW_COST),
    ("expensive", HIGH_COST),
    ("high", HIGH_COST),
    ("costly", HIGH_COST),
];

/// Articles, conjunctions and request verbs that carry no search meaning.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "with", "that", "which", "for", "of", "to", "in", "on",
    "me", "my", "i", "some", "any", "cards", "card", "find", "show", "give", "get", "want",
    "need", "looking", "search", "all", "have", "has", "is", "are",
];

/// Residual text shorter than this is noise, not oracle text.
const MIN_RESIDUAL_LEN: usize = 3;

// ============================================================================
// Fallback Compiler
// ============================================================================

#[derive(Debug, Clone)]
pub struct FallbackCompiler {
    /// Slang phrases pre-split into words, longest first
    slang: Vec<(Vec<&'static str>, &'static str)>,
    stop_words: HashSet<&'static str>,
}

impl Default for FallbackCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCompiler {
    pub fn new() -> Self {
        let mut slang: Vec<(Vec<&'static str>, &'static str)> = SLANG
            .iter()
            .map(|(phrase, fragment)| (phrase.split(' ').collect(), *fragment))
            .collect();
        slang.sort_by(|a, b| {
            b.0.len()
                .cmp(&a.0.len())
                .then_with(|| b.0.concat().len().cmp(&a.0.concat().len()))
        });

        Self {
            slang,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Compile natural language into a best-effort grammar query. Returns
    /// the trimmed input unchanged when nothing could be extracted.
    pub fn compile(&self, text: &str) -> String {
        let mut words = normalize_words(text);

        let mut slang_out = Vec::new();
        for (phrase, fragment) in &self.slang {
            if remove_phrase(&mut words, phrase) {
                push_unique(&mut slang_out, *fragment);
            }
        }

        let colors = take_words(&mut words, COLORS);
        let types = take_words(&mut words, TYPES);
        let cost = take_words(&mut words, COST_WORDS);

        words.retain(|w| !self.stop_words.contains(w.as_str()));
        let residual = words.join(" ");

        let mut out: Vec<String> = slang_out
            .into_iter()
            .chain(colors)
            .chain(types)
            .chain(cost)
            .map(str::to_string)
            .collect();
        if residual.len() >= MIN_RESIDUAL_LEN {
            out.push(format!("o:\"{}\"", residual.replace('"', "")));
        }

        if out.is_empty() {
            return text.trim().to_string();
        }
        out.join(" ")
    }
}

/// Lowercase and split into words, dropping punctuation except `'` and `-`.
fn normalize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Remove every occurrence of `phrase` from `words`. Returns true if any matched.
fn remove_phrase(words: &mut Vec<String>, phrase: &[&str]) -> bool {
    if phrase.is_empty() || words.len() < phrase.len() {
        return false;
    }

    let mut matched = false;
    let mut i = 0;
    while i + phrase.len() <= words.len() {
        let window = &words[i..i + phrase.len()];
        if window.iter().zip(phrase).all(|(w, p)| w == p) {
            words.drain(i..i + phrase.len());
            matched = true;
        } else {
            i += 1;
        }
    }
    matched
}

/// Consume words found in `table`, returning their fragments in input order.
fn take_words(words: &mut Vec<String>, table: &[(&str, &'static str)]) -> Vec<&'static str> {
    let mut fragments = Vec::new();
    words.retain(|word| {
        match table.iter().find(|(w, _)| *w == word.as_str()) {
            Some((_, fragment)) => {
                push_unique(&mut fragments, *fragment);
                false
            }
            None => true,
        }
    });
    fragments
}

fn push_unique(out: &mut Vec<&'static str>, fragment: &'static str) {
    if !out.contains(&fragment) {
        out.push(fragment);
    }
}

/// Compile with a default compiler.
pub fn compile(text: &str) -> String {
    static COMPILER: once_cell::sync::Lazy<FallbackCompiler> =
        once_cell::sync::Lazy::new(FallbackCompiler::new);
    COMPILER.compile(text)
}
