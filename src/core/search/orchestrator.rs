//! Search Orchestrator
//!
//! Turns one submit event into at most one committed search. Each call mints
//! a request token; only the holder of the newest token may commit, so late
//! answers from superseded requests are dropped at a single commit site.
//!
//! The translator call is raced against a deadline and the shutdown signal.
//! Timeouts and translator errors degrade to the local fallback compiler;
//! rate-limit errors open a cooldown window during which nothing is sent.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tokio::sync::watch;
use tokio::time::Instant;

use super::history::{HistoryEntry, SearchContext, SearchHistory};
use super::rate_limit::{countdown_secs, RateLimitWindow};
use super::types::{
    FilterHints, Notice, OrchestratorConfig, RawQuery, RerunOutcome, SearchCommit, SearchOptions,
    SearchOutcome, SearchSink,
};
use crate::core::grammar::validator::{collapse_whitespace, GrammarValidator};
use crate::core::translate::{
    Explanation, FallbackCompiler, Source, TranslateError, TranslationFilters, TranslationRequest,
    TranslationResult, Translator,
};

const FALLBACK_CONFIDENCE: f32 = 0.3;

struct DedupEntry {
    result: TranslationResult,
    stored_at: Instant,
}

struct State {
    window: RateLimitWindow,
    history: SearchHistory,
    context: Option<SearchContext>,
    dedup: LruCache<String, DedupEntry>,
}

/// Decrements the in-flight counter on every exit path.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Why the primary translator could not be used.
enum Degraded {
    TimedOut,
    Unavailable(TranslateError),
}

pub struct SearchOrchestrator {
    translator: Arc<dyn Translator>,
    sink: Arc<dyn SearchSink>,
    fallback: FallbackCompiler,
    validator: GrammarValidator,
    config: OrchestratorConfig,
    generation: AtomicU64,
    in_flight: AtomicUsize,
    state: Mutex<State>,
    shutdown_tx: watch::Sender<bool>,
}

impl SearchOrchestrator {
    pub fn new(
        translator: Arc<dyn Translator>,
        sink: Arc<dyn SearchSink>,
        config: OrchestratorConfig,
    ) -> Self {
        let dedup_capacity = NonZeroUsize::new(config.dedup_capacity).unwrap_or(NonZeroUsize::MIN);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            translator,
            sink,
            fallback: FallbackCompiler::new(),
            validator: GrammarValidator::new(),
            state: Mutex::new(State {
                window: RateLimitWindow::default(),
                history: SearchHistory::new(config.history_size),
                context: None,
                dedup: LruCache::new(dedup_capacity),
            }),
            config,
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            shutdown_tx,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translate and commit one search.
    pub async fn search(&self, query: RawQuery, options: SearchOptions) -> SearchOutcome {
        let text = collapse_whitespace(&query.text);
        if text.is_empty() {
            return SearchOutcome::Ignored;
        }
        if self.is_shut_down() {
            return SearchOutcome::Aborted;
        }

        let blocked = self.state().window.remaining(Instant::now());
        if let Some(retry_after) = blocked {
            tracing::debug!(query = %text, ?retry_after, "Search blocked by rate-limit window");
            self.sink.notify(Notice::PleaseWait {
                seconds: countdown_secs(retry_after),
            });
            return SearchOutcome::Blocked { retry_after };
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::enter(&self.in_flight);
        self.state().history.record(&text);

        let key = dedup_key(&text, &options);
        if !options.bypass_cache {
            if let Some(hit) = self.recent_translation(&key) {
                tracing::debug!(token, query = %text, "Reusing recent translation");
                let mut result = hit.relabeled(Source::Cache);
                if options.user_edited {
                    result = self.sanitize(result);
                }
                return self.commit(token, &text, &query.hints, result);
            }
        }

        let request = TranslationRequest {
            query: text.clone(),
            filters: options.format.as_ref().map(|format| TranslationFilters {
                format: Some(format.clone()),
                ..Default::default()
            }),
            bypass_cache: options.bypass_cache,
            cache_salt: options.cache_salt.clone(),
        };

        tracing::debug!(token, query = %text, translator = self.translator.name(), "Dispatching translation");
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let settled = tokio::select! {
            settled = tokio::time::timeout(
                self.config.translator_timeout(),
                self.translator.translate(request),
            ) => settled,
            _ = shutdown_rx.wait_for(|stopped| *stopped) => {
                tracing::info!(token, "Search aborted by shutdown");
                return SearchOutcome::Aborted;
            }
        };

        match settled {
            Ok(Ok(result)) => {
                self.remember_translation(key, &result);
                let result = if options.user_edited {
                    self.sanitize(result)
                } else {
                    result
                };
                self.commit(token, &text, &query.hints, result)
            }
            Ok(Err(e)) if e.is_rate_limited() => self.open_rate_limit_window(token, &e),
            Ok(Err(e)) => self.degrade(token, &text, &query.hints, Degraded::Unavailable(e)),
            Err(_) => self.degrade(token, &text, &query.hints, Degraded::TimedOut),
        }
    }

    /// Re-run a hand-edited grammar query without translating it.
    ///
    /// Active hints are merged into the text before validation. Unlike the
    /// translated path, validation problems are reported instead of repaired.
    pub fn rerun_edited(&self, edited_query: &str, hints: &FilterHints) -> RerunOutcome {
        let merged = hints.merge_into(&collapse_whitespace(edited_query));
        let outcome = self.validator.validate(&merged);

        let mut issues = outcome.issues;
        if outcome.sanitized.is_empty() && issues.is_empty() {
            issues.push("Query is empty".to_string());
        }
        if !issues.is_empty() {
            tracing::debug!(query = %merged, ?issues, "Rejected edited query");
            self.sink.notify(Notice::InvalidQuery {
                issues: issues.clone(),
            });
            return RerunOutcome::Rejected {
                issues,
                sanitized: outcome.sanitized,
            };
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let natural = self
            .state()
            .context
            .as_ref()
            .map(|c| c.natural_query.clone())
            .unwrap_or_else(|| outcome.sanitized.clone());
        let result = TranslationResult::new(
            outcome.sanitized,
            Explanation::new("Edited search query", 1.0),
            Source::Deterministic,
        );

        match self.commit(token, &natural, hints, result) {
            SearchOutcome::Committed(commit) => RerunOutcome::Committed(commit),
            _ => RerunOutcome::Rejected {
                issues: vec!["Superseded by a newer search".to_string()],
                sanitized: merged,
            },
        }
    }

    /// Abort outstanding translator calls. Later searches return `Aborted`.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn current_token(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state().history.entries()
    }

    pub fn context(&self) -> Option<SearchContext> {
        self.state().context.clone()
    }

    /// Remaining rate-limit cooldown, if any.
    pub fn rate_limited_for(&self) -> Option<Duration> {
        self.state().window.remaining(Instant::now())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// The only place a search is committed.
    fn commit(
        &self,
        token: u64,
        natural_query: &str,
        hints: &FilterHints,
        mut result: TranslationResult,
    ) -> SearchOutcome {
        let current = self.generation.load(Ordering::SeqCst);
        if current != token {
            tracing::debug!(token, current, "Discarding stale search result");
            return SearchOutcome::Superseded { token };
        }

        let grammar_query = hints.merge_into(&result.grammar_query);
        result.grammar_query.clone_from(&grammar_query);
        self.state().context = Some(SearchContext {
            natural_query: natural_query.to_string(),
            grammar_query: grammar_query.clone(),
            hints: hints.clone(),
        });

        let commit = SearchCommit {
            token,
            grammar_query,
            result: Some(result),
            natural_query: Some(natural_query.to_string()),
        };
        tracing::info!(
            token,
            grammar = %commit.grammar_query,
            source = ?commit.result.as_ref().map(|r| r.source),
            "Committing search"
        );
        self.sink.on_search(&commit);
        SearchOutcome::Committed(commit)
    }

    fn sanitize(&self, mut result: TranslationResult) -> TranslationResult {
        let outcome = self.validator.validate(&result.grammar_query);
        result.grammar_query = outcome.sanitized;
        result.validation_issues.extend(outcome.issues);
        result
    }

    fn degrade(
        &self,
        token: u64,
        text: &str,
        hints: &FilterHints,
        reason: Degraded,
    ) -> SearchOutcome {
        let (notice, assumption) = match reason {
            Degraded::TimedOut => {
                tracing::warn!(token, "Translation timed out, using fallback compiler");
                (
                    Notice::TranslationTimedOut,
                    "Translation timed out; used local keyword matching".to_string(),
                )
            }
            Degraded::Unavailable(e) => {
                tracing::warn!(token, error = %e, "Translator failed, using fallback compiler");
                (
                    Notice::TranslatorUnavailable {
                        message: e.to_string(),
                    },
                    "Translator unavailable; used local keyword matching".to_string(),
                )
            }
        };

        if self.current_token() != token {
            return SearchOutcome::Superseded { token };
        }

        let result = TranslationResult::new(
            self.fallback.compile(text),
            Explanation::new("Matched known words locally", FALLBACK_CONFIDENCE)
                .with_assumption(assumption),
            Source::ClientFallback,
        );
        self.sink.notify(notice);
        self.commit(token, text, hints, result)
    }

    fn open_rate_limit_window(&self, token: u64, error: &TranslateError) -> SearchOutcome {
        let cooldown = self
            .config
            .rate_limit_cooldown()
            .max(error.retry_after().unwrap_or_default());
        self.state().window.lock(Instant::now(), cooldown);

        tracing::warn!(token, ?cooldown, error = %error, "Translator rate limited, pausing searches");
        self.sink.notify(Notice::RateLimited {
            seconds: countdown_secs(cooldown),
        });
        SearchOutcome::RateLimited {
            retry_after: cooldown,
        }
    }

    fn recent_translation(&self, key: &str) -> Option<TranslationResult> {
        let ttl = Duration::from_secs(self.config.dedup_ttl_secs);
        let mut state = self.state();
        let (fresh, result) = state
            .dedup
            .get(key)
            .map(|entry| (entry.stored_at.elapsed() < ttl, entry.result.clone()))?;
        if !fresh {
            state.dedup.pop(key);
            return None;
        }
        Some(result)
    }

    fn remember_translation(&self, key: String, result: &TranslationResult) {
        if self.config.dedup_capacity == 0 {
            return;
        }
        self.state().dedup.put(
            key,
            DedupEntry {
                result: result.clone(),
                stored_at: Instant::now(),
            },
        );
    }
}

fn dedup_key(text: &str, options: &SearchOptions) -> String {
    format!(
        "{}|{}|{}",
        text.to_lowercase(),
        options.format.as_deref().unwrap_or(""),
        options.cache_salt.as_deref().unwrap_or("")
    )
}
