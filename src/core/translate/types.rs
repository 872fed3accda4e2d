//! Translation Types
//!
//! The translation result handed to the consuming UI and the structured
//! intent the resolver extracted.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Source
// ============================================================================

/// Which tier produced a grammar query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Deterministic,
    PatternMatch,
    Ai,
    ClientFallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Deterministic => "deterministic",
            Source::PatternMatch => "pattern_match",
            Source::Ai => "ai",
            Source::ClientFallback => "client_fallback",
        }
    }

    /// Parse a wire label. Unrecognized labels are treated as generative output.
    pub fn parse(label: &str) -> Self {
        match label {
            "cache" => Source::Cache,
            "deterministic" => Source::Deterministic,
            "pattern_match" => Source::PatternMatch,
            "client_fallback" => Source::ClientFallback,
            _ => Source::Ai,
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Ai
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Source::parse(&label))
    }
}

// ============================================================================
// Explanation
// ============================================================================

/// Human-readable account of a translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub readable: String,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default = "default_confidence", deserialize_with = "deserialize_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    0.5
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    Ok(clamp_confidence(value))
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl Explanation {
    pub fn new(readable: impl Into<String>, confidence: f32) -> Self {
        Self {
            readable: readable.into(),
            assumptions: Vec::new(),
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }
}

// ============================================================================
// Search Intent
// ============================================================================

/// What the resolver understood from the natural-language input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchIntent {
    pub colors: Vec<String>,
    pub types: Vec<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mana_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_mana_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl SearchIntent {
    pub fn is_empty(&self) -> bool {
        *self == SearchIntent::default()
    }
}

// ============================================================================
// Translation Result
// ============================================================================

/// A translated query plus its provenance. Built once per accepted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub grammar_query: String,
    pub explanation: Explanation,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub validation_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<SearchIntent>,
    #[serde(default)]
    pub show_affiliate: bool,
}

impl TranslationResult {
    pub fn new(grammar_query: impl Into<String>, explanation: Explanation, source: Source) -> Self {
        Self {
            grammar_query: grammar_query.into(),
            explanation,
            source,
            validation_issues: Vec::new(),
            intent: None,
            show_affiliate: false,
        }
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.validation_issues = issues;
        self
    }

    pub fn with_intent(mut self, intent: SearchIntent) -> Self {
        if !intent.is_empty() {
            self.intent = Some(intent);
        }
        self
    }

    /// Copy of this result relabeled with a different source.
    pub fn relabeled(&self, source: Source) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}
