//! Translator Boundary
//!
//! The trait the search orchestrator calls to turn natural language into a
//! grammar query, the request/response wire shapes, and the error type shared
//! by every implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Explanation, SearchIntent, Source, TranslationResult};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Translator rejected request: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TranslateError {
    /// Whether this failure should open a client-side cooldown. Matches HTTP
    /// 429 and upstream messages that talk about rates or waiting.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            TranslateError::RateLimited { .. } => true,
            TranslateError::Api { status: 429, .. } => true,
            TranslateError::Http(e) if e.status().map(|s| s.as_u16()) == Some(429) => true,
            TranslateError::Api { message, .. }
            | TranslateError::Rejected(message)
            | TranslateError::InvalidResponse(message) => mentions_rate_limit(message),
            _ => false,
        }
    }

    /// Server-provided wait, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            TranslateError::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    message.contains("rate") || message.contains("Rate limit") || message.contains("Please wait")
}

pub type Result<T> = std::result::Result<T, TranslateError>;

// ============================================================================
// Wire Types
// ============================================================================

/// Structured filters applied on top of the translated query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_identity: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mana_value: Option<u32>,
}

impl TranslationFilters {
    pub fn is_empty(&self) -> bool {
        self.format.is_none()
            && self.color_identity.as_ref().map_or(true, Vec::is_empty)
            && self.max_mana_value.is_none()
    }

    /// Render as grammar terms: `f:`, `id<=`, `mv<=`.
    pub fn to_grammar(&self) -> Vec<String> {
        let mut terms = Vec::new();
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            terms.push(format!("f:{}", format.to_lowercase()));
        }
        if let Some(colors) = self.color_identity.as_ref().filter(|c| !c.is_empty()) {
            terms.push(format!("id<={}", colors.concat().to_lowercase()));
        }
        if let Some(mv) = self.max_mana_value {
            terms.push(format!("mv<={mv}"));
        }
        terms
    }
}

/// A translation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<TranslationFilters>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bypass_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_salt: Option<String>,
}

impl TranslationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: TranslationFilters) -> Self {
        self.filters = (!filters.is_empty()).then_some(filters);
        self
    }
}

/// The translate endpoint's response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<SearchIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_affiliate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn into_result(self) -> Result<TranslationResult> {
        if !self.success {
            return Err(TranslateError::Rejected(
                self.error.unwrap_or_else(|| "Translation failed".to_string()),
            ));
        }

        let grammar_query = self
            .grammar_query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| TranslateError::InvalidResponse("Missing grammarQuery".to_string()))?;

        let explanation = self
            .explanation
            .unwrap_or_else(|| Explanation::new(format!("Searching for {grammar_query}"), 0.5));

        Ok(TranslationResult {
            grammar_query,
            explanation,
            source: self.source.unwrap_or_default(),
            validation_issues: self.validation_issues,
            intent: self.intent,
            show_affiliate: self.show_affiliate.unwrap_or(false),
        })
    }
}

impl From<TranslationResult> for TranslationResponse {
    fn from(result: TranslationResult) -> Self {
        Self {
            success: true,
            grammar_query: Some(result.grammar_query),
            explanation: Some(result.explanation),
            source: Some(result.source),
            validation_issues: result.validation_issues,
            intent: result.intent,
            show_affiliate: Some(result.show_affiliate),
            error: None,
        }
    }
}

// ============================================================================
// Translator Trait
// ============================================================================

/// Anything that can translate natural language into a grammar query.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult>;
}
