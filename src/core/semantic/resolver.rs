//! Semantic Resolver
//!
//! Referentially transparent resolver over the mapping tables. Matched text
//! is consumed as it resolves, so each phrase feeds at most one table, and a
//! concept already emitted is not emitted again.

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::tables::{
    CardProfile, SlangEntry, ARCHETYPES, CARDS_LIKE, CARD_NAME_SIMILARITY, COLOR_GROUPS,
    CONCEPTS, CREATURE_TYPES, KEYWORDS, LIKE_TRIGGER, MANA_VALUE_PATTERNS, MAX_CARD_NAME_WORDS,
    MONO_COLORS, REMAINDER_STOP_WORDS, SLANG,
};
use crate::core::grammar::vocabulary::default_tag_registry;
use crate::core::translate::fallback::{COLORS, STOP_WORDS, TYPES};
use crate::core::translate::types::SearchIntent;

// ============================================================================
// Compiled Tables
// ============================================================================

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid mapping pattern {pattern:?}: {e}"))
}

static SLANG_RE: Lazy<Vec<(Regex, &'static SlangEntry)>> = Lazy::new(|| {
    let mut entries: Vec<&'static SlangEntry> = SLANG.iter().collect();
    entries.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()));
    entries
        .into_iter()
        .map(|e| (compile(&format!(r"\b{}\b", regex::escape(e.phrase))), e))
        .collect()
});

static CONCEPT_RE: Lazy<Vec<Regex>> =
    Lazy::new(|| CONCEPTS.iter().map(|c| compile(c.pattern)).collect());

static ARCHETYPE_RE: Lazy<Vec<Regex>> =
    Lazy::new(|| ARCHETYPES.iter().map(|a| compile(a.pattern)).collect());

static KEYWORD_RE: Lazy<Vec<Regex>> =
    Lazy::new(|| KEYWORDS.iter().map(|k| compile(k.pattern)).collect());

static MANA_VALUE_RE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    MANA_VALUE_PATTERNS
        .iter()
        .map(|(pattern, template)| (compile(pattern), *template))
        .collect()
});

static LIKE_TRIGGER_RE: Lazy<Regex> = Lazy::new(|| compile(LIKE_TRIGGER));

static MONO_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"\bmono[- ]?(white|blue|black|red|green)\b"));

static COLOR_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"\b({})\b", COLOR_GROUPS.join("|"))));

static TAG_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(?:otag|oracletag|function):([a-z0-9-]+)"));

// ============================================================================
// Types
// ============================================================================

/// Which table produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Slang,
    Concept,
    Archetype,
    CardsLike,
    Keyword,
    Attribute,
}

/// One consumed phrase and what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingMatch {
    pub kind: MatchKind,
    pub matched: String,
    pub fragment: String,
    pub concept: String,
    /// False when an earlier match already emitted this concept
    pub emitted: bool,
}

/// The outcome of resolving one natural-language query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub fragments: Vec<String>,
    pub matches: Vec<MappingMatch>,
    /// Unmatched words with stop words removed
    pub remainder: String,
    pub intent: SearchIntent,
}

impl Resolution {
    pub fn query(&self) -> String {
        self.fragments.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Did the tables account for every meaningful word?
    pub fn is_complete(&self) -> bool {
        !self.fragments.is_empty() && self.remainder.is_empty()
    }
}

/// Accumulates fragments while enforcing one emission per concept.
#[derive(Default)]
struct Collector {
    resolution: Resolution,
    emitted: HashSet<String>,
}

impl Collector {
    fn emit(&mut self, kind: MatchKind, matched: &str, fragment: &str, concept: &str) -> bool {
        let emitted = self.emitted.insert(concept.to_string());
        if emitted {
            self.resolution.fragments.push(fragment.to_string());
        }
        self.resolution.matches.push(MappingMatch {
            kind,
            matched: matched.trim().to_string(),
            fragment: fragment.to_string(),
            concept: concept.to_string(),
            emitted,
        });
        emitted
    }
}

// ============================================================================
// Semantic Engine
// ============================================================================

/// Resolves natural language against the mapping tables.
#[derive(Debug, Clone)]
pub struct SemanticEngine {
    tag_registry: HashSet<String>,
}

impl Default for SemanticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticEngine {
    /// Engine backed by the built-in oracle-tag vocabulary.
    pub fn new() -> Self {
        Self::with_tag_registry(default_tag_registry())
    }

    /// Engine backed by a caller-supplied tag registry, e.g. one fetched from
    /// the search backend. Logs every table tag the registry lacks.
    pub fn with_tag_registry(tag_registry: HashSet<String>) -> Self {
        let engine = Self { tag_registry };
        for tag in engine.audit_tags() {
            tracing::warn!(tag = %tag, "Mapping tables reference an unregistered oracle tag");
        }
        engine
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_registry.contains(tag)
    }

    /// Tags referenced by any table that the registry does not contain.
    pub fn audit_tags(&self) -> Vec<String> {
        referenced_tags()
            .into_iter()
            .filter(|tag| !self.tag_registry.contains(tag))
            .collect()
    }

    /// Resolve a natural-language query.
    pub fn resolve(&self, text: &str) -> Resolution {
        let mut work = normalize_text(text);
        let mut out = Collector::default();

        // A card name can contain words other tables would claim
        // ("counterspell", "tutor"), so the reference is cut out up front and
        // emitted at its own priority below.
        let like = find_card_reference(&work);
        if let Some(found) = &like {
            cut(&mut work, found.range.clone());
        }

        self.resolve_slang(&mut work, &mut out);
        self.resolve_concepts(&mut work, &mut out);
        self.resolve_archetypes(&mut work, &mut out);

        if let Some(found) = like {
            out.emit(
                MatchKind::CardsLike,
                &found.matched,
                found.profile.fragment,
                found.profile.concept,
            );
            out.resolution.intent.like_card = Some(found.profile.name.to_string());
        }

        self.resolve_keywords(&mut work, &mut out);
        self.resolve_attributes(&mut work, &mut out);

        out.resolution.remainder = remainder_of(&work);
        tracing::trace!(
            query = %text,
            fragments = ?out.resolution.fragments,
            remainder = %out.resolution.remainder,
            "Resolved semantic mappings"
        );
        out.resolution
    }

    fn resolve_slang(&self, work: &mut String, out: &mut Collector) {
        for (re, entry) in SLANG_RE.iter() {
            if let Some(matched) = consume(work, re) {
                if out.emit(MatchKind::Slang, &matched, entry.fragment, entry.concept) {
                    if let Some(format) = entry.fragment.strip_prefix("f:") {
                        out.resolution.intent.format = Some(format.to_string());
                    }
                }
            }
        }
    }

    fn resolve_concepts(&self, work: &mut String, out: &mut Collector) {
        for (concept, re) in CONCEPTS.iter().zip(CONCEPT_RE.iter()) {
            let Some(matched) = consume(work, re) else {
                continue;
            };

            let tagged = self.has_tag(concept.tag);
            let fragment = if tagged {
                format!("otag:{}", concept.tag)
            } else {
                tracing::debug!(tag = concept.tag, "Tag not registered, using oracle-text fallback");
                concept.fallback.to_string()
            };

            if out.emit(MatchKind::Concept, &matched, &fragment, concept.tag) && tagged {
                out.resolution.intent.tags.push(concept.tag.to_string());
            }
        }
    }

    fn resolve_archetypes(&self, work: &mut String, out: &mut Collector) {
        for (archetype, re) in ARCHETYPES.iter().zip(ARCHETYPE_RE.iter()) {
            if let Some(matched) = consume(work, re) {
                let concept = format!("archetype:{}", archetype.name);
                if out.emit(MatchKind::Archetype, &matched, archetype.fragment, &concept)
                    && out.resolution.intent.archetype.is_none()
                {
                    out.resolution.intent.archetype = Some(archetype.name.to_string());
                }
            }
        }
    }

    fn resolve_keywords(&self, work: &mut String, out: &mut Collector) {
        for (entry, re) in KEYWORDS.iter().zip(KEYWORD_RE.iter()) {
            if let Some(matched) = consume(work, re) {
                let fragment = if entry.keyword.contains(' ') {
                    format!("kw:\"{}\"", entry.keyword)
                } else {
                    format!("kw:{}", entry.keyword)
                };
                let concept = format!("kw:{}", entry.keyword);
                if out.emit(MatchKind::Keyword, &matched, &fragment, &concept) {
                    out.resolution.intent.keywords.push(entry.keyword.to_string());
                }
            }
        }
    }

    fn resolve_attributes(&self, work: &mut String, out: &mut Collector) {
        for (re, template) in MANA_VALUE_RE.iter() {
            let Some(caps) = re.captures(work) else {
                continue;
            };
            let matched = caps.get(0).map_or("", |m| m.as_str()).to_string();
            let fragment = match caps.get(1) {
                Some(n) => template.replace("{n}", n.as_str()),
                None => template.to_string(),
            };
            *work = re.replace_all(work, " ").into_owned();
            if out.emit(MatchKind::Attribute, &matched, &fragment, "mana-value") {
                apply_mana_value(&fragment, &mut out.resolution.intent);
            }
        }

        while let Some(caps) = MONO_COLOR_RE.captures(work) {
            let matched = caps.get(0).map_or("", |m| m.as_str()).to_string();
            let color = caps.get(1).map_or("", |m| m.as_str());
            let letter = MONO_COLORS
                .iter()
                .find(|(name, _)| *name == color)
                .map_or("c", |(_, letter)| *letter);
            let range = caps.get(0).map_or(0..0, |m| m.range());
            cut(work, range);
            if out.emit(MatchKind::Attribute, &matched, &format!("c={letter}"), "color") {
                out.resolution.intent.colors.push(letter.to_string());
            }
        }

        while let Some(m) = COLOR_GROUP_RE.find(work) {
            let group = m.as_str().to_string();
            let range = m.range();
            cut(work, range);
            let concept = format!("identity:{group}");
            if out.emit(MatchKind::Attribute, &group, &format!("id<={group}"), &concept) {
                out.resolution.intent.colors.push(group);
            }
        }

        let mut kept = Vec::new();
        for word in work.split_whitespace() {
            if let Some((_, fragment)) = COLORS.iter().find(|(w, _)| *w == word) {
                if out.emit(MatchKind::Attribute, word, fragment, fragment) {
                    let color = fragment.trim_start_matches("c:");
                    out.resolution.intent.colors.push(color.to_string());
                }
            } else if let Some((_, fragment)) = TYPES.iter().find(|(w, _)| *w == word) {
                if out.emit(MatchKind::Attribute, word, fragment, fragment) {
                    let card_type = fragment.trim_start_matches("t:");
                    out.resolution.intent.types.push(card_type.to_string());
                }
            } else if let Some((_, subtype)) = CREATURE_TYPES.iter().find(|(w, _)| *w == word) {
                let fragment = format!("t:{subtype}");
                if out.emit(MatchKind::Attribute, word, &fragment, &fragment) {
                    out.resolution.intent.types.push(subtype.to_string());
                }
            } else {
                kept.push(word.to_string());
            }
        }
        *work = format!(" {} ", kept.join(" "));
    }
}

/// Resolve with a shared default engine.
pub fn resolve(text: &str) -> Resolution {
    static ENGINE: Lazy<SemanticEngine> = Lazy::new(SemanticEngine::new);
    ENGINE.resolve(text)
}

/// Every oracle tag the tables reference, sorted.
pub fn referenced_tags() -> Vec<String> {
    let mut tags: BTreeSet<String> = CONCEPTS.iter().map(|c| c.tag.to_string()).collect();

    let fragments = SLANG
        .iter()
        .map(|s| s.fragment)
        .chain(ARCHETYPES.iter().map(|a| a.fragment))
        .chain(CARDS_LIKE.iter().map(|c| c.fragment));
    for fragment in fragments {
        for caps in TAG_REFERENCE_RE.captures_iter(fragment) {
            tags.insert(caps[1].to_string());
        }
    }

    tags.into_iter().collect()
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Lowercase, strip accents and punctuation, single-space, and pad with
/// spaces so every phrase has a boundary on both sides.
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            c if c.is_alphanumeric() || matches!(c, '\'' | '-' | '+' | '/') => c,
            _ => ' ',
        })
        .collect::<String>()
        .to_lowercase();

    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Remove every match of `re` from `work`, returning the first match's text.
fn consume(work: &mut String, re: &Regex) -> Option<String> {
    let matched = re.find(work)?.as_str().to_string();
    *work = re.replace_all(work, " ").into_owned();
    Some(matched)
}

fn cut(work: &mut String, range: Range<usize>) {
    work.replace_range(range, " ");
}

fn remainder_of(work: &str) -> String {
    work.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .filter(|w| !STOP_WORDS.contains(w) && !REMAINDER_STOP_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn apply_mana_value(fragment: &str, intent: &mut SearchIntent) {
    let Some(rest) = fragment.strip_prefix("mv") else {
        return;
    };
    let digits_at = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
    let (op, digits) = rest.split_at(digits_at);
    let Ok(n) = digits.parse::<u32>() else {
        return;
    };

    match op {
        "<=" => intent.max_mana_value = Some(n),
        "<" => intent.max_mana_value = Some(n.saturating_sub(1)),
        ">=" => intent.min_mana_value = Some(n),
        ">" => {
            if let Some(min) = n.checked_add(1) {
                intent.min_mana_value = Some(min);
            }
        }
        "=" => {
            intent.min_mana_value = Some(n);
            intent.max_mana_value = Some(n);
        }
        _ => {}
    }
}

// ============================================================================
// Cards Like X
// ============================================================================

struct CardReference {
    range: Range<usize>,
    matched: String,
    profile: &'static CardProfile,
}

/// Find the first `like <card>` reference, trying the longest name first and
/// falling back to fuzzy matching for misspellings.
fn find_card_reference(work: &str) -> Option<CardReference> {
    for trigger in LIKE_TRIGGER_RE.find_iter(work) {
        let tail = &work[trigger.end()..];
        let words: Vec<&str> = tail.split_whitespace().take(MAX_CARD_NAME_WORDS).collect();

        let mut best: Option<(usize, &'static CardProfile, f64)> = None;
        for len in (1..=words.len()).rev() {
            let candidate = words[..len].join(" ");
            if let Some(profile) = CARDS_LIKE.iter().find(|p| p.name == candidate) {
                best = Some((len, profile, 1.0));
                break;
            }
            for profile in CARDS_LIKE {
                let score = strsim::jaro_winkler(&candidate, profile.name);
                if score >= CARD_NAME_SIMILARITY && best.map_or(true, |(_, _, s)| score > s) {
                    best = Some((len, profile, score));
                }
            }
        }

        if let Some((len, profile, score)) = best {
            let name_len = words[..len].join(" ").len();
            let range = trigger.start()..trigger.end() + name_len;
            tracing::debug!(card = profile.name, score, "Matched reference card");
            return Some(CardReference {
                matched: work[range.clone()].to_string(),
                range,
                profile,
            });
        }
    }
    None
}
