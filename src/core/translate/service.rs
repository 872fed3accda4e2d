//! Translation Service
//!
//! The primary translator's body, used in-process or behind the HTTP
//! endpoint in [`crate::core::server`]:
//! 1. Per-window request limiting
//! 2. Translation cache lookup (skipped with `bypass_cache`)
//! 3. Grammar pass-through for input that already is a valid query
//! 4. Semantic table resolution
//! 5. Generative fallback (or oracle text) for the unmatched remainder
//! 6. Request filters, then the grammar validator as a backstop

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::generator::QueryGenerator;
use super::translator::{Result, TranslateError, TranslationRequest, Translator};
use super::types::{Explanation, Source, TranslationResult};
use crate::core::grammar::validator::{collapse_whitespace, GrammarValidator};
use crate::core::semantic::{Resolution, SemanticEngine};

/// Residual text shorter than this is not worth an oracle-text term.
const MIN_RESIDUAL_LEN: usize = 3;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum cached translations
    pub cache_capacity: usize,
    /// Cached translations older than this are recomputed
    pub cache_ttl_secs: u64,
    /// Requests accepted per rolling minute; 0 disables limiting
    pub requests_per_minute: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_ttl_secs: 3600,
            requests_per_minute: 60,
        }
    }
}

// ============================================================================
// Cache and Limiter State
// ============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    result: TranslationResult,
    inserted_at: Instant,
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug)]
struct RequestWindow {
    started: Instant,
    count: u32,
}

impl RequestWindow {
    const LENGTH: Duration = Duration::from_secs(60);

    /// Count a request, or return how long until the window resets.
    fn admit(&mut self, limit: u32, now: Instant) -> std::result::Result<(), Duration> {
        if limit == 0 {
            return Ok(());
        }
        if now.duration_since(self.started) >= Self::LENGTH {
            self.started = now;
            self.count = 0;
        }
        if self.count >= limit {
            return Err(Self::LENGTH.saturating_sub(now.duration_since(self.started)));
        }
        self.count += 1;
        Ok(())
    }
}

// ============================================================================
// Translation Service
// ============================================================================

pub struct TranslationService {
    engine: SemanticEngine,
    validator: GrammarValidator,
    generator: Option<Arc<dyn QueryGenerator>>,
    cache: Mutex<LruCache<String, CacheEntry>>,
    stats: Mutex<CacheStats>,
    window: Mutex<RequestWindow>,
    config: ServiceConfig,
}

impl TranslationService {
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_engine(config, SemanticEngine::new())
    }

    pub fn with_engine(config: ServiceConfig, engine: SemanticEngine) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            engine,
            validator: GrammarValidator::new(),
            generator: None,
            cache: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
            window: Mutex::new(RequestWindow {
                started: Instant::now(),
                count: 0,
            }),
            config,
        }
    }

    /// Attach a generative backend for text the tables cannot resolve.
    pub fn with_generator(mut self, generator: Arc<dyn QueryGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub async fn cache_stats(&self) -> CacheStats {
        let mut stats = *self.stats.lock().await;
        stats.size = self.cache.lock().await.len();
        stats
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    fn cache_key(request: &TranslationRequest) -> String {
        let filters = request
            .filters
            .as_ref()
            .and_then(|f| serde_json::to_string(f).ok())
            .unwrap_or_default();
        format!(
            "{}|{}|{}",
            collapse_whitespace(&request.query).to_lowercase(),
            filters,
            request.cache_salt.as_deref().unwrap_or("")
        )
    }

    async fn cached(&self, key: &str) -> Option<TranslationResult> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let mut cache = self.cache.lock().await;
        let hit = match cache
            .get(key)
            .map(|entry| (entry.inserted_at.elapsed() < ttl, entry.result.clone()))
        {
            Some((true, result)) => Some(result),
            Some((false, _)) => {
                cache.pop(key);
                None
            }
            None => None,
        };
        drop(cache);

        let mut stats = self.stats.lock().await;
        if hit.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        hit
    }

    async fn build(&self, query: &str, request: &TranslationRequest) -> Result<TranslationResult> {
        let filter_terms = request
            .filters
            .as_ref()
            .map(|f| f.to_grammar())
            .unwrap_or_default();

        if self.validator.looks_like_grammar(query) {
            let outcome = self.validator.validate(query);
            if outcome.valid {
                let grammar = join_terms(&outcome.sanitized, &filter_terms);
                let explanation = Explanation::new("Query is already valid search syntax", 1.0);
                return self.finish(grammar, explanation, Source::Deterministic, None);
            }
        }

        let resolution = self.engine.resolve(query);
        let readable = describe(&resolution);

        if resolution.is_complete() {
            let grammar = join_terms(&resolution.query(), &filter_terms);
            let explanation = Explanation::new(readable, 0.9);
            return self.finish(grammar, explanation, Source::PatternMatch, Some(resolution));
        }

        if let Some(generator) = &self.generator {
            // Send the whole query when nothing matched so the model sees context.
            let prompt = if resolution.is_empty() {
                query
            } else {
                resolution.remainder.as_str()
            };
            match generator.generate(prompt).await {
                Ok(generated) => {
                    let grammar =
                        join_terms(&format!("{} {}", resolution.query(), generated), &filter_terms);
                    let explanation = Explanation::new(readable, 0.7)
                        .with_assumption(format!("Generated by {}", generator.model()));
                    return self.finish(grammar, explanation, Source::Ai, Some(resolution));
                }
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "Query generator failed, treating remainder as oracle text");
                }
            }
        }

        let mut explanation = Explanation::new(readable, if resolution.is_empty() { 0.4 } else { 0.6 });
        let mut base = resolution.query();
        if resolution.remainder.len() >= MIN_RESIDUAL_LEN {
            let residual = resolution.remainder.replace('"', "");
            base = format!("{base} o:\"{residual}\"");
            explanation = explanation
                .with_assumption(format!("Searched card text for \"{residual}\""));
        }
        let grammar = join_terms(&base, &filter_terms);
        self.finish(grammar, explanation, Source::PatternMatch, Some(resolution))
    }

    /// Validate the assembled query and build the final result.
    fn finish(
        &self,
        grammar: String,
        explanation: Explanation,
        source: Source,
        resolution: Option<Resolution>,
    ) -> Result<TranslationResult> {
        let outcome = self.validator.validate(&grammar);
        if outcome.sanitized.is_empty() {
            return Err(TranslateError::Rejected(
                "No searchable terms found in query".to_string(),
            ));
        }

        let mut result = TranslationResult::new(outcome.sanitized, explanation, source)
            .with_issues(outcome.issues);
        if let Some(resolution) = resolution {
            result = result.with_intent(resolution.intent);
        }
        Ok(result)
    }
}

#[async_trait]
impl Translator for TranslationService {
    fn name(&self) -> &str {
        "embedded"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult> {
        let query = collapse_whitespace(&request.query);
        if query.is_empty() {
            return Err(TranslateError::Rejected("Query is empty".to_string()));
        }

        if let Err(wait) = self
            .window
            .lock()
            .await
            .admit(self.config.requests_per_minute, Instant::now())
        {
            let retry_after_secs = wait.as_secs_f64().ceil() as u64;
            tracing::warn!(retry_after_secs, "Translation request limit reached");
            return Err(TranslateError::RateLimited {
                retry_after_secs: Some(retry_after_secs.max(1)),
            });
        }

        let key = Self::cache_key(&request);
        if !request.bypass_cache {
            if let Some(hit) = self.cached(&key).await {
                tracing::debug!(query = %query, "Translation cache hit");
                return Ok(hit.relabeled(Source::Cache));
            }
        }

        let result = self.build(&query, &request).await?;
        tracing::info!(
            query = %query,
            grammar = %result.grammar_query,
            source = %result.source,
            "Translated query"
        );

        self.cache.lock().await.put(
            key,
            CacheEntry {
                result: result.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(result)
    }
}

fn join_terms(base: &str, extra: &[String]) -> String {
    let mut parts = vec![base.trim().to_string()];
    parts.extend(extra.iter().cloned());
    collapse_whitespace(&parts.join(" "))
}

fn describe(resolution: &Resolution) -> String {
    let matched: Vec<String> = resolution
        .matches
        .iter()
        .filter(|m| m.emitted)
        .map(|m| format!("\"{}\" as {}", m.matched, m.fragment))
        .collect();

    if matched.is_empty() {
        "No known phrases matched".to_string()
    } else {
        format!("Interpreted {}", matched.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translate::translator::TranslationFilters;

    fn service() -> TranslationService {
        TranslationService::new(ServiceConfig::default())
    }

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl QueryGenerator for FixedGenerator {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_valid_grammar_is_deterministic() {
        let result = service()
            .translate(TranslationRequest::new("t:creature c:r mv<=3"))
            .await
            .unwrap();
        assert_eq!(result.source, Source::Deterministic);
        assert_eq!(result.grammar_query, "t:creature c:r mv<=3");
        assert_eq!(result.explanation.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_pattern_match() {
        let result = service()
            .translate(TranslationRequest::new("cheap blue counterspells"))
            .await
            .unwrap();
        assert_eq!(result.source, Source::PatternMatch);
        assert_eq!(result.grammar_query, "otag:counterspell mv<=3 c:u");
        assert!(result.validation_issues.is_empty());
        assert_eq!(result.intent.unwrap().tags, vec!["counterspell"]);
    }

    #[tokio::test]
    async fn test_remainder_becomes_oracle_text() {
        let result = service()
            .translate(TranslationRequest::new("green creatures that punch"))
            .await
            .unwrap();
        assert_eq!(result.source, Source::PatternMatch);
        assert_eq!(result.grammar_query, "c:g t:creature o:\"punch\"");
        assert_eq!(result.explanation.assumptions.len(), 1);
    }

    #[tokio::test]
    async fn test_generator_handles_remainder() {
        let service = service().with_generator(Arc::new(FixedGenerator("o:fight")));
        let result = service
            .translate(TranslationRequest::new("green creatures that punch"))
            .await
            .unwrap();
        assert_eq!(result.source, Source::Ai);
        assert_eq!(result.grammar_query, "c:g t:creature o:fight");
    }

    #[tokio::test]
    async fn test_generator_output_is_validated() {
        let service = service().with_generator(Arc::new(FixedGenerator("o:fight bogus:key")));
        let result = service
            .translate(TranslationRequest::new("zzz qqq"))
            .await
            .unwrap();
        assert_eq!(result.grammar_query, "o:fight");
        assert_eq!(result.validation_issues, vec!["Unknown search key(s): bogus"]);
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_oracle_text() {
        let mut generator = crate::core::translate::generator::MockQueryGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Err(TranslateError::Api {
                status: 500,
                message: "upstream down".to_string(),
            })
        });

        let service = service().with_generator(Arc::new(generator));
        let result = service
            .translate(TranslationRequest::new("green creatures that punch"))
            .await
            .unwrap();
        assert_eq!(result.source, Source::PatternMatch);
        assert_eq!(result.grammar_query, "c:g t:creature o:\"punch\"");
    }

    #[tokio::test]
    async fn test_filters_appended() {
        let request = TranslationRequest::new("board wipes").with_filters(TranslationFilters {
            format: Some("commander".to_string()),
            color_identity: Some(vec!["W".to_string()]),
            max_mana_value: Some(4),
        });
        let result = service().translate(request).await.unwrap();
        assert_eq!(result.grammar_query, "otag:board-wipe f:commander id<=w mv<=4");
    }

    #[tokio::test]
    async fn test_cache_hit_and_bypass() {
        let service = service();
        let first = service
            .translate(TranslationRequest::new("board wipes"))
            .await
            .unwrap();
        assert_eq!(first.source, Source::PatternMatch);

        let second = service
            .translate(TranslationRequest::new("  Board   Wipes "))
            .await
            .unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.grammar_query, first.grammar_query);

        let mut bypass = TranslationRequest::new("board wipes");
        bypass.bypass_cache = true;
        assert_eq!(service.translate(bypass).await.unwrap().source, Source::PatternMatch);

        let mut salted = TranslationRequest::new("board wipes");
        salted.cache_salt = Some("v2".to_string());
        assert_eq!(service.translate(salted).await.unwrap().source, Source::PatternMatch);

        let stats = service.cache_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 2);
    }

    #[tokio::test]
    async fn test_request_limit() {
        let service = TranslationService::new(ServiceConfig {
            requests_per_minute: 2,
            ..Default::default()
        });
        service.translate(TranslationRequest::new("ramp")).await.unwrap();
        service.translate(TranslationRequest::new("ramp")).await.unwrap();

        let err = service
            .translate(TranslationRequest::new("ramp"))
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.retry_after().is_some());
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let err = service()
            .translate(TranslationRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_nothing_searchable_rejected() {
        let err = service()
            .translate(TranslationRequest::new("show me the"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Rejected(_)));
    }

    #[test]
    fn test_request_window_resets() {
        let start = Instant::now();
        let mut window = RequestWindow {
            started: start,
            count: 0,
        };
        assert!(window.admit(1, start).is_ok());
        assert!(window.admit(1, start + Duration::from_secs(10)).is_err());
        assert!(window.admit(1, start + Duration::from_secs(61)).is_ok());
        assert!(window.admit(0, start).is_ok());
    }
}
