//! Search Types
//!
//! Inputs, outcomes and the sink trait shared by the orchestrator and
//! whatever renders its results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::grammar::{tokenize, GrammarToken};
use crate::core::translate::TranslationResult;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Deadline for one primary translation call
    pub translator_timeout_ms: u64,
    /// How long searches stay blocked after a rate-limit failure
    pub rate_limit_cooldown_secs: u64,
    /// Recent-search history bound
    pub history_size: usize,
    /// Recent successful translations kept for duplicate suppression
    pub dedup_capacity: usize,
    pub dedup_ttl_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            translator_timeout_ms: 8_000,
            rate_limit_cooldown_secs: 30,
            history_size: 20,
            dedup_capacity: 64,
            dedup_ttl_secs: 300,
        }
    }
}

impl OrchestratorConfig {
    pub fn translator_timeout(&self) -> Duration {
        Duration::from_millis(self.translator_timeout_ms)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Structured filters chosen in the UI alongside the free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterHints {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    /// Inclusive `(min, max)` mana value range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_value: Option<(u32, u32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl FilterHints {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.types.is_empty()
            && self.mana_value.is_none()
            && self.sort.is_none()
    }

    /// Render the hints as grammar terms.
    pub fn to_grammar(&self) -> Vec<String> {
        let mut terms = Vec::new();

        let colors: String = self
            .colors
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();
        if !colors.is_empty() {
            terms.push(format!("c:{colors}"));
        }

        for card_type in &self.types {
            let card_type = card_type.trim().to_lowercase();
            if !card_type.is_empty() {
                terms.push(format!("t:{}", grammar_value(&card_type)));
            }
        }

        if let Some((min, max)) = self.mana_value {
            let (min, max) = (min.min(max), min.max(max));
            if min > 0 {
                terms.push(format!("mv>={min}"));
            }
            terms.push(format!("mv<={max}"));
        }

        if let Some(sort) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            terms.push(format!("order:{}", grammar_value(&sort.to_lowercase())));
        }

        terms
    }

    /// Append the hint terms that `query` does not already contain at the top
    /// level. Merging twice gives the same query as merging once.
    pub fn merge_into(&self, query: &str) -> String {
        let existing: Vec<String> = tokenize(query)
            .into_iter()
            .filter_map(|token| match token {
                GrammarToken::Term(term) => Some(term.raw().to_lowercase()),
                _ => None,
            })
            .collect();
        let mut merged = query.trim().to_string();
        for term in self.to_grammar() {
            if !existing.contains(&term) {
                if !merged.is_empty() {
                    merged.push(' ');
                }
                merged.push_str(&term);
            }
        }
        merged
    }
}

/// Quote a hint value that would otherwise split into several terms.
fn grammar_value(value: &str) -> String {
    let value = value.replace('"', "");
    if value.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        format!("\"{}\"", value.split_whitespace().collect::<Vec<_>>().join(" "))
    } else {
        value
    }
}

/// A user's search input, passed by value into the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuery {
    pub text: String,
    #[serde(default)]
    pub hints: FilterHints,
}

impl RawQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hints: FilterHints::default(),
        }
    }

    pub fn with_hints(mut self, hints: FilterHints) -> Self {
        self.hints = hints;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// The text was edited by hand and must be validated before use
    pub user_edited: bool,
    /// Skip duplicate suppression and the translator's cache
    pub bypass_cache: bool,
    pub format: Option<String>,
    pub cache_salt: Option<String>,
}

// ============================================================================
// Outcomes
// ============================================================================

/// User-facing notices raised during a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A rate-limit window is active
    PleaseWait { seconds: u64 },
    TranslationTimedOut,
    TranslatorUnavailable { message: String },
    /// The translator reported a rate limit; searches pause for `seconds`
    RateLimited { seconds: u64 },
    InvalidQuery { issues: Vec<String> },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::PleaseWait { seconds } => {
                write!(f, "Please wait {seconds} seconds before searching again")
            }
            Notice::TranslationTimedOut => {
                write!(f, "Translation is taking too long, using a simpler search")
            }
            Notice::TranslatorUnavailable { .. } => {
                write!(f, "Translation is unavailable, using a simpler search")
            }
            Notice::RateLimited { seconds } => {
                write!(f, "Too many searches, try again in {seconds} seconds")
            }
            Notice::InvalidQuery { issues } => write!(f, "Query has problems: {}", issues.join("; ")),
        }
    }
}

/// One committed search, handed to the [`SearchSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCommit {
    pub token: u64,
    pub grammar_query: String,
    pub result: Option<TranslationResult>,
    /// Natural-language text to show next to the results
    pub natural_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Empty input; nothing happened
    Ignored,
    /// A rate-limit window was already active; no request was made
    Blocked { retry_after: Duration },
    Committed(SearchCommit),
    /// A newer search took over before this one settled
    Superseded { token: u64 },
    /// The translator rate limited this request; nothing was committed
    RateLimited { retry_after: Duration },
    /// The orchestrator shut down while the request was in flight
    Aborted,
}

impl SearchOutcome {
    pub fn commit(&self) -> Option<&SearchCommit> {
        match self {
            SearchOutcome::Committed(commit) => Some(commit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RerunOutcome {
    Committed(SearchCommit),
    Rejected { issues: Vec<String>, sanitized: String },
}

/// Receives committed searches and notices. Implemented by the UI layer.
#[cfg_attr(test, mockall::automock)]
pub trait SearchSink: Send + Sync {
    fn on_search(&self, commit: &SearchCommit);

    fn notify(&self, notice: Notice);
}
