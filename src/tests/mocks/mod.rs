//! Mock implementations for testing
//!
//! Hand-written translator and sink doubles for orchestrator scenarios. The
//! translator replies per query with a scripted delay, so tests can control
//! completion order under a paused tokio clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::search::{Notice, SearchCommit, SearchSink};
use crate::core::translate::{
    Explanation, Result, Source, TranslateError, TranslationRequest, TranslationResult, Translator,
};

// ============================================================================
// Scripted Translator
// ============================================================================

/// What the scripted translator does for one query.
#[derive(Debug, Clone)]
pub enum Reply {
    Grammar(String),
    RateLimited(Option<u64>),
    Fail(String),
}

impl Reply {
    fn into_result(self) -> Result<TranslationResult> {
        match self {
            Reply::Grammar(grammar) => Ok(TranslationResult::new(
                grammar,
                Explanation::new("scripted", 0.8),
                Source::Ai,
            )),
            Reply::RateLimited(retry_after_secs) => {
                Err(TranslateError::RateLimited { retry_after_secs })
            }
            Reply::Fail(message) => Err(TranslateError::Api {
                status: 500,
                message,
            }),
        }
    }
}

/// Translator with per-query replies and delays. Unscripted queries echo
/// back as an oracle-text search immediately.
#[derive(Default)]
pub struct ScriptedTranslator {
    script: Mutex<HashMap<String, (Duration, Reply)>>,
    requests: Mutex<Vec<TranslationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, query: &str, delay: Duration, reply: Reply) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(query.to_string(), (delay, reply));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let scripted = self.script.lock().unwrap().get(&request.query).cloned();
        let (delay, reply) = scripted.unwrap_or_else(|| {
            (
                Duration::ZERO,
                Reply::Grammar(format!("o:\"{}\"", request.query)),
            )
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.into_result()
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// Sink that records everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    commits: Mutex<Vec<SearchCommit>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commits(&self) -> Vec<SearchCommit> {
        self.commits.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl SearchSink for RecordingSink {
    fn on_search(&self, commit: &SearchCommit) {
        self.commits.lock().unwrap().push(commit.clone());
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
